//! # solvarr
//!
//! A browser-automation proxy: POST a target URL, and solvarr drives a fresh
//! headless Chrome session to the page, waits out bot-challenge interstitials
//! ("Just a moment…", "Checking your browser…"), and returns the rendered
//! document as JSON.
//!
//! ## Features
//!
//! - One isolated browser session per request, torn down on every exit path
//! - Marker-based challenge detection with a configurable marker list
//! - Fixed-cadence challenge polling with a bounded ceiling
//! - Bounded retry loop with fresh sessions and randomized backoff
//! - Stale-content fallback when retries are spent on an unresolved challenge
//! - FlareSolverr-compatible `/v1` wire contract
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use solvarr::{ChromeSessionFactory, Solver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let solver = Solver::new(Arc::new(ChromeSessionFactory::new()));
//!     let result = solver.fetch("https://example.com", 35_000).await?;
//!     println!("{} bytes of rendered content", result.content.len());
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod challenge;
pub mod config;
pub mod error;
pub mod server;
pub mod solver;
pub mod timing;

pub use crate::browser::{
    BrowserSession,
    ChromeSession,
    ChromeSessionFactory,
    DEFAULT_USER_AGENTS,
    SessionConfig,
    SessionFactory,
};

pub use crate::challenge::{
    ChallengeDetector,
    ChallengeState,
    ChallengeWaiter,
    DEFAULT_CHALLENGE_MARKERS,
    WaitClear,
    WaitError,
};

pub use crate::config::AppConfig;

pub use crate::error::{SolverError, SolverResult};

pub use crate::server::{AppState, routes, serve};

pub use crate::solver::{
    FetchOutcome,
    FetchResult,
    Navigator,
    Solver,
    SolverBuilder,
    SolverConfig,
};

pub use crate::timing::{DelayPolicy, JitteredDelays, NoDelays};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
