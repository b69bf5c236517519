//! Shared test doubles: a scripted session factory that counts session
//! creation and teardown, records the timeout each navigation received, and
//! serves canned page snapshots.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use solvarr::{
    BrowserSession, NoDelays, SessionConfig, SessionFactory, Solver, SolverBuilder, SolverError,
    SolverResult,
};

pub const CLEAR_PAGE: &str =
    "<html><head><title>Example Domain</title></head><body>real content</body></html>";

pub const CHALLENGE_PAGE: &str =
    "<html><head><title>Just a moment...</title></head><body>Checking your browser before accessing</body></html>";

#[derive(Default)]
pub struct Counters {
    /// Calls to `SessionFactory::create`, successful or not.
    pub create_calls: AtomicUsize,
    /// Sessions actually handed out.
    pub created: AtomicUsize,
    /// Calls to `BrowserSession::close`.
    pub closed: AtomicUsize,
    /// Calls to `BrowserSession::page_content`.
    pub page_reads: AtomicUsize,
    /// Timeout (ms) received by the most recent navigation.
    pub last_timeout_ms: AtomicU64,
}

impl Counters {
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn page_reads(&self) -> usize {
        self.page_reads.load(Ordering::SeqCst)
    }

    pub fn last_timeout_ms(&self) -> u64 {
        self.last_timeout_ms.load(Ordering::SeqCst)
    }
}

/// One scripted page read.
pub enum Read {
    Page(&'static str),
    Fail(&'static str),
}

/// Script for one session the factory will hand out.
pub struct SessionPlan {
    pub fail_create: Option<&'static str>,
    pub fail_navigate: Option<&'static str>,
    pub reads: Vec<Read>,
}

impl SessionPlan {
    /// Session whose consecutive content reads return `pages`; once the
    /// script is exhausted the last page repeats, like a real stuck page.
    pub fn pages(pages: &[&'static str]) -> Self {
        Self {
            fail_create: None,
            fail_navigate: None,
            reads: pages.iter().map(|page| Read::Page(page)).collect(),
        }
    }

    pub fn with_reads(reads: Vec<Read>) -> Self {
        Self {
            fail_create: None,
            fail_navigate: None,
            reads,
        }
    }

    pub fn create_failure(message: &'static str) -> Self {
        Self {
            fail_create: Some(message),
            fail_navigate: None,
            reads: Vec::new(),
        }
    }

    pub fn navigate_failure(message: &'static str) -> Self {
        Self {
            fail_create: None,
            fail_navigate: Some(message),
            reads: Vec::new(),
        }
    }
}

pub struct MockSession {
    fail_navigate: Option<&'static str>,
    reads: Mutex<VecDeque<Read>>,
    last_page: Mutex<String>,
    counters: Arc<Counters>,
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&self, _url: &str, timeout: Duration) -> SolverResult<()> {
        self.counters
            .last_timeout_ms
            .store(timeout.as_millis() as u64, Ordering::SeqCst);
        match self.fail_navigate {
            Some(message) => Err(SolverError::Navigation(message.to_string())),
            None => Ok(()),
        }
    }

    async fn page_content(&self) -> SolverResult<String> {
        self.counters.page_reads.fetch_add(1, Ordering::SeqCst);
        let next = self.reads.lock().unwrap().pop_front();
        match next {
            Some(Read::Page(page)) => {
                *self.last_page.lock().unwrap() = page.to_string();
                Ok(page.to_string())
            }
            Some(Read::Fail(message)) => Err(SolverError::Navigation(message.to_string())),
            None => Ok(self.last_page.lock().unwrap().clone()),
        }
    }

    async fn execute_script(&self, _script: &str) -> SolverResult<()> {
        Ok(())
    }

    async fn close(&self) -> SolverResult<()> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out one scripted session per `create` call, in order. When the
/// scripts run out it falls back to an immediately-clear page.
pub struct MockFactory {
    plans: Mutex<VecDeque<SessionPlan>>,
    pub counters: Arc<Counters>,
}

impl MockFactory {
    pub fn new(plans: Vec<SessionPlan>) -> Self {
        Self {
            plans: Mutex::new(plans.into()),
            counters: Arc::new(Counters::default()),
        }
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn create(&self, _config: &SessionConfig) -> SolverResult<Box<dyn BrowserSession>> {
        self.counters.create_calls.fetch_add(1, Ordering::SeqCst);

        let plan = self
            .plans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| SessionPlan::pages(&[CLEAR_PAGE]));

        if let Some(message) = plan.fail_create {
            return Err(SolverError::SessionInit(message.to_string()));
        }

        self.counters.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            fail_navigate: plan.fail_navigate,
            reads: Mutex::new(plan.reads.into()),
            last_page: Mutex::new(String::new()),
            counters: self.counters.clone(),
        }))
    }
}

/// Solver wired for tests: zero delays and a fast polling cadence.
pub fn test_solver_builder(factory: Arc<MockFactory>) -> SolverBuilder {
    Solver::builder(factory)
        .with_delay_policy(Arc::new(NoDelays))
        .with_poll_interval(Duration::from_millis(1))
}
