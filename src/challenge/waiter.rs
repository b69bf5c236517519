//! Fixed-cadence polling while a challenge resolves.

use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::time::sleep;

use crate::browser::BrowserSession;
use crate::challenge::{ChallengeDetector, ChallengeState};
use crate::error::SolverError;

/// Successful wait: the page cleared after `polls` re-reads.
#[derive(Debug)]
pub struct WaitClear {
    pub content: String,
    pub polls: u32,
}

#[derive(Debug, Error)]
pub enum WaitError {
    /// The polling ceiling was reached while the page was still challenged.
    /// Carries the last-observed content so callers can surface it as a
    /// stale result.
    #[error("challenge did not clear within {polls} polls")]
    ChallengeTimeout { content: String, polls: u32 },

    /// The session became unreachable mid-wait.
    #[error(transparent)]
    Session(#[from] SolverError),
}

/// Polls a challenged session at a fixed interval up to a bounded ceiling.
///
/// No backoff between polls; the maximum wall-clock wait is exactly
/// `poll_interval * max_polls` (30 seconds with the defaults).
#[derive(Debug, Clone)]
pub struct ChallengeWaiter {
    poll_interval: Duration,
    max_polls: u32,
}

impl Default for ChallengeWaiter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1_000), 30)
    }
}

impl ChallengeWaiter {
    pub fn new(poll_interval: Duration, max_polls: u32) -> Self {
        Self {
            poll_interval,
            max_polls,
        }
    }

    /// Re-read and reclassify the page until it clears or the ceiling is hit.
    pub async fn await_clear(
        &self,
        session: &dyn BrowserSession,
        detector: &ChallengeDetector,
    ) -> Result<WaitClear, WaitError> {
        let mut last_content = String::new();

        for poll in 1..=self.max_polls {
            sleep(self.poll_interval).await;

            let content = session.page_content().await.map_err(WaitError::Session)?;
            match detector.classify(&content) {
                ChallengeState::Clear => {
                    return Ok(WaitClear {
                        content,
                        polls: poll,
                    });
                }
                ChallengeState::Challenged => {
                    debug!("challenge still present after poll {poll}/{}", self.max_polls);
                    last_content = content;
                }
            }
        }

        Err(WaitError::ChallengeTimeout {
            content: last_content,
            polls: self.max_polls,
        })
    }
}
