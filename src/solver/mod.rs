//! Bypass orchestration.
//!
//! Composes the session factory, navigator, challenge detector, and challenge
//! waiter into a bounded retry loop. Every attempt runs against an
//! independently fresh browser session; sessions from failed attempts are
//! torn down before the next attempt starts and are never reused.

pub mod navigator;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use tokio::time::sleep;
use url::Url;

use crate::browser::{BrowserSession, SessionConfig, SessionFactory, user_agents};
use crate::challenge::{ChallengeDetector, ChallengeState, ChallengeWaiter, WaitError};
use crate::error::{SolverError, SolverResult};
use crate::timing::{DelayPolicy, JitteredDelays};

pub use navigator::Navigator;

/// Terminal outcome tag of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page cleared (or never showed) a challenge.
    Success,
    /// Retries were exhausted while a challenge was still unresolved; the
    /// content is the best-effort, possibly still-challenged snapshot.
    StaleSuccess,
}

/// Result of a completed fetch. `elapsed` is wall-clock time from request
/// acceptance to the terminal outcome, inclusive of all retries and waits.
#[derive(Debug)]
pub struct FetchResult {
    pub outcome: FetchOutcome,
    pub content: String,
    pub elapsed: Duration,
    pub attempts: u32,
}

/// Solver tuning knobs plus the session profile template.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Hard ceiling on full navigate-classify-await attempts.
    pub max_attempts: u32,
    /// Fixed cadence of the challenge waiter.
    pub poll_interval: Duration,
    /// Polling ceiling per attempt.
    pub max_polls: u32,
    pub headless: bool,
    pub no_sandbox: bool,
    pub window: (u32, u32),
    pub block_images: bool,
    /// Candidate pool; one entry is chosen per session.
    pub user_agents: Vec<String>,
    /// Optional upstream proxy handed to every session.
    pub proxy: Option<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            poll_interval: Duration::from_millis(1_000),
            max_polls: 30,
            headless: true,
            no_sandbox: true,
            window: (1920, 1080),
            block_images: false,
            user_agents: user_agents::DEFAULT_USER_AGENTS.clone(),
            proxy: None,
        }
    }
}

impl SolverConfig {
    /// Materialize the per-attempt session profile, choosing a user agent
    /// from the candidate pool.
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            headless: self.headless,
            no_sandbox: self.no_sandbox,
            width: self.window.0,
            height: self.window.1,
            user_agent: user_agents::pick_user_agent(&self.user_agents),
            block_images: self.block_images,
            proxy: self.proxy.clone(),
        }
    }
}

/// Fluent builder for [`Solver`].
pub struct SolverBuilder {
    config: SolverConfig,
    factory: Arc<dyn SessionFactory>,
    delays: Arc<dyn DelayPolicy>,
    detector: ChallengeDetector,
}

impl SolverBuilder {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            config: SolverConfig::default(),
            factory,
            delays: Arc::new(JitteredDelays::default()),
            detector: ChallengeDetector::new(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self.config.max_attempts = self.config.max_attempts.max(1);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts.max(1);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, polls: u32) -> Self {
        self.config.max_polls = polls;
        self
    }

    pub fn with_user_agents<I, S>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.user_agents = agents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    pub fn with_delay_policy(mut self, delays: Arc<dyn DelayPolicy>) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_detector(mut self, detector: ChallengeDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn build(self) -> Solver {
        let waiter = ChallengeWaiter::new(self.config.poll_interval, self.config.max_polls);
        let navigator = Navigator::new(self.delays.clone());
        Solver {
            config: self.config,
            factory: self.factory,
            delays: self.delays,
            detector: self.detector,
            navigator,
            waiter,
        }
    }
}

/// What one attempt produced before the retry policy is applied.
enum Attempt {
    Clear { content: String },
    StillChallenged { content: String },
}

/// Challenge-bypass orchestrator.
pub struct Solver {
    config: SolverConfig,
    factory: Arc<dyn SessionFactory>,
    delays: Arc<dyn DelayPolicy>,
    detector: ChallengeDetector,
    navigator: Navigator,
    waiter: ChallengeWaiter,
}

impl Solver {
    pub fn builder(factory: Arc<dyn SessionFactory>) -> SolverBuilder {
        SolverBuilder::new(factory)
    }

    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        SolverBuilder::new(factory).build()
    }

    /// Fetch `url` through a fresh browser session, retrying across attempts
    /// until the page clears, retries are exhausted, or a terminal error
    /// remains on the final attempt.
    pub async fn fetch(&self, url: &str, timeout_ms: u64) -> SolverResult<FetchResult> {
        let started = Instant::now();
        let target = Url::parse(url)?;
        let timeout = Duration::from_millis(timeout_ms);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let last = attempt >= self.config.max_attempts;

            match self.run_attempt(&target, timeout).await {
                Ok(Attempt::Clear { content }) => {
                    info!("{target} resolved on attempt {attempt}");
                    return Ok(FetchResult {
                        outcome: FetchOutcome::Success,
                        content,
                        elapsed: started.elapsed(),
                        attempts: attempt,
                    });
                }
                Ok(Attempt::StillChallenged { content }) if last => {
                    warn!(
                        "{target} still challenged after {attempt} attempts; returning stale content"
                    );
                    return Ok(FetchResult {
                        outcome: FetchOutcome::StaleSuccess,
                        content,
                        elapsed: started.elapsed(),
                        attempts: attempt,
                    });
                }
                Ok(Attempt::StillChallenged { .. }) => {
                    warn!("{target} still challenged after attempt {attempt}; retrying with a fresh session");
                }
                Err(err) if last => {
                    warn!("{target} failed on final attempt {attempt}: {err}");
                    return Err(err);
                }
                Err(err) => {
                    warn!("{target} attempt {attempt} failed: {err}; retrying");
                }
            }

            let backoff = self.delays.retry_backoff();
            if !backoff.is_zero() {
                sleep(backoff).await;
            }
        }
    }

    /// One full attempt with its own session. Teardown runs on every exit
    /// path, including errors from navigation and polling.
    async fn run_attempt(&self, target: &Url, timeout: Duration) -> SolverResult<Attempt> {
        let session = self.factory.create(&self.config.session_config()).await?;

        let result = self.drive(session.as_ref(), target, timeout).await;

        if let Err(err) = session.close().await {
            warn!("session teardown reported an error: {err}");
        }

        result
    }

    async fn drive(
        &self,
        session: &dyn BrowserSession,
        target: &Url,
        timeout: Duration,
    ) -> SolverResult<Attempt> {
        let content = self.navigator.navigate(session, target, timeout).await?;

        match self.detector.classify(&content) {
            ChallengeState::Clear => Ok(Attempt::Clear { content }),
            ChallengeState::Challenged => {
                info!("challenge detected on {target}, polling for resolution");
                match self.waiter.await_clear(session, &self.detector).await {
                    Ok(clear) => {
                        info!("challenge on {target} cleared after {} polls", clear.polls);
                        Ok(Attempt::Clear {
                            content: clear.content,
                        })
                    }
                    Err(WaitError::ChallengeTimeout { content, polls }) => {
                        warn!("challenge on {target} did not clear within {polls} polls");
                        Ok(Attempt::StillChallenged { content })
                    }
                    // A session that became unreachable mid-wait exhausts the
                    // current attempt; the retry policy decides what's next.
                    Err(WaitError::Session(err)) => Err(err),
                }
            }
        }
    }
}
