//! Browser session abstraction.
//!
//! The browser engine and its driver protocol are consumed as an opaque
//! capability: the solver only needs to create a session, navigate it, read
//! the rendered document, run a script, and close it. The traits here are the
//! seam between the orchestration logic and the Chrome-backed implementation
//! in [`chrome`], and they are what the test suite mocks.

pub mod chrome;
pub mod stealth;
pub mod user_agents;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SolverResult;

pub use chrome::{ChromeSession, ChromeSessionFactory};
pub use user_agents::{DEFAULT_USER_AGENTS, pick_user_agent};

/// Immutable per-request session profile.
///
/// Constructed once per attempt and never mutated; the user agent is chosen
/// from the candidate pool at construction time.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub headless: bool,
    pub no_sandbox: bool,
    pub width: u32,
    pub height: u32,
    pub user_agent: String,
    pub block_images: bool,
    pub proxy: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: true,
            width: 1920,
            height: 1080,
            user_agent: user_agents::pick_user_agent(&user_agents::DEFAULT_USER_AGENTS),
            block_images: false,
            proxy: None,
        }
    }
}

/// One isolated browser-engine instance driving a single page lifecycle.
///
/// A session is exclusively owned by the request that created it. It must be
/// released via [`BrowserSession::close`] exactly once, on every exit path.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Drive the session to `url`, enforcing `timeout` as a hard ceiling on
    /// the page load.
    async fn navigate(&self, url: &str, timeout: Duration) -> SolverResult<()>;

    /// Read the full rendered document as a string (post-JavaScript DOM
    /// serialization, not the raw HTTP body).
    async fn page_content(&self) -> SolverResult<String>;

    /// Execute a script in the page context.
    async fn execute_script(&self, script: &str) -> SolverResult<()>;

    /// Release the session and its engine process.
    async fn close(&self) -> SolverResult<()>;
}

/// Builds a fresh, ready-to-navigate session from a [`SessionConfig`].
///
/// Implementations apply the anti-automation setup (see [`stealth`]) before
/// handing the session out, so callers never navigate an unmasked session.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self, config: &SessionConfig) -> SolverResult<Box<dyn BrowserSession>>;
}
