//! Error taxonomy shared across the solver components.

use thiserror::Error;

/// Result alias used across the solver layers.
pub type SolverResult<T> = Result<T, SolverError>;

/// Failures that can occur while driving a browser session to a target page.
///
/// Navigation timeouts are kept distinct from other transport failures so the
/// orchestrator can log them separately; both follow the same retry policy.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("browser session could not be created: {0}")]
    SessionInit(String),

    #[error("page load of {url} exceeded {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("invalid target url: {0}")]
    Url(#[from] url::ParseError),

    #[error("browser engine fault: {0}")]
    Fault(String),
}
