//! Chrome-backed session factory.
//!
//! Wraps the blocking `headless_chrome` CDP client. Every driver call runs on
//! the blocking thread pool so concurrent requests keep making progress while
//! one session idles in a page load or a poll wait.

use std::ffi::OsStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::{debug, info, warn};
use tokio::task;

use crate::browser::stealth::STEALTH_SCRIPT;
use crate::browser::{BrowserSession, SessionConfig, SessionFactory};
use crate::error::{SolverError, SolverResult};

/// Spawns one Chrome process per created session.
#[derive(Debug, Clone, Default)]
pub struct ChromeSessionFactory {
    /// Extra Chrome switches appended after the profile-derived ones.
    pub extra_args: Vec<String>,
}

impl ChromeSessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn create(&self, config: &SessionConfig) -> SolverResult<Box<dyn BrowserSession>> {
        let config = config.clone();
        let extra_args = self.extra_args.clone();

        let session = task::spawn_blocking(move || launch(&config, &extra_args))
            .await
            .map_err(join_fault)??;

        // Mask automation signals before the caller gets to navigate.
        session.execute_script(STEALTH_SCRIPT).await?;

        Ok(Box::new(session))
    }
}

fn launch(config: &SessionConfig, extra_args: &[String]) -> SolverResult<ChromeSession> {
    info!(
        "launching chrome session (headless: {}, {}x{})",
        config.headless, config.width, config.height
    );

    let mut args: Vec<String> = vec![
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-extensions".to_string(),
        format!("--window-size={},{}", config.width, config.height),
        format!("--user-agent={}", config.user_agent),
    ];

    if config.no_sandbox {
        args.push("--no-sandbox".to_string());
        args.push("--disable-setuid-sandbox".to_string());
    }

    if config.block_images {
        args.push("--blink-settings=imagesEnabled=false".to_string());
    }

    if let Some(ref proxy) = config.proxy {
        args.push(format!("--proxy-server={proxy}"));
    }

    args.extend(extra_args.iter().cloned());

    let os_args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();

    let launch_options = LaunchOptionsBuilder::default()
        .headless(config.headless)
        .args(os_args)
        .build()
        .map_err(|err| SolverError::SessionInit(format!("failed to build launch options: {err}")))?;

    let browser = Browser::new(launch_options)
        .map_err(|err| SolverError::SessionInit(format!("failed to launch browser: {err}")))?;

    let tab = browser
        .new_tab()
        .map_err(|err| SolverError::SessionInit(format!("failed to open tab: {err}")))?;

    Ok(ChromeSession {
        browser: Mutex::new(Some(browser)),
        tab,
    })
}

/// One live Chrome process and the tab driving the request's page lifecycle.
pub struct ChromeSession {
    // Taken out on close so the process is reaped exactly once; dropping the
    // handle also kills Chrome if close was never reached.
    browser: Mutex<Option<Browser>>,
    tab: Arc<Tab>,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> SolverResult<()> {
        let tab = self.tab.clone();
        let url = url.to_string();

        task::spawn_blocking(move || {
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url)
                .map_err(|err| SolverError::Navigation(format!("{url}: {err}")))?;
            tab.wait_until_navigated()
                .map_err(|err| classify_wait_error(&url, timeout, &err.to_string()))?;
            debug!("navigation to {url} complete");
            Ok(())
        })
        .await
        .map_err(join_fault)?
    }

    async fn page_content(&self) -> SolverResult<String> {
        let tab = self.tab.clone();

        task::spawn_blocking(move || {
            tab.get_content()
                .map_err(|err| SolverError::Navigation(format!("failed to read page content: {err}")))
        })
        .await
        .map_err(join_fault)?
    }

    async fn execute_script(&self, script: &str) -> SolverResult<()> {
        let tab = self.tab.clone();
        let script = script.to_string();

        task::spawn_blocking(move || {
            tab.evaluate(&script, false)
                .map(|_| ())
                .map_err(|err| SolverError::Fault(format!("script execution failed: {err}")))
        })
        .await
        .map_err(join_fault)?
    }

    async fn close(&self) -> SolverResult<()> {
        let browser = self
            .browser
            .lock()
            .map_err(|_| SolverError::Fault("browser handle poisoned".to_string()))?
            .take();

        let Some(browser) = browser else {
            warn!("chrome session already closed");
            return Ok(());
        };

        let tab = self.tab.clone();
        task::spawn_blocking(move || {
            if let Err(err) = tab.close(true) {
                debug!("tab close reported: {err}");
            }
            // Dropping the handle terminates the Chrome process.
            drop(browser);
        })
        .await
        .map_err(join_fault)?;

        info!("chrome session closed");
        Ok(())
    }
}

fn classify_wait_error(url: &str, timeout: Duration, message: &str) -> SolverError {
    let lowered = message.to_lowercase();
    if lowered.contains("timed out") || lowered.contains("timeout") {
        SolverError::NavigationTimeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        SolverError::Navigation(format!("{url}: {message}"))
    }
}

fn join_fault(err: task::JoinError) -> SolverError {
    SolverError::Fault(format!("blocking browser task failed: {err}"))
}
