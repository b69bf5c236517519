//! Single-session navigation with a post-load settle wait.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::time::sleep;
use url::Url;

use crate::browser::BrowserSession;
use crate::error::SolverResult;
use crate::timing::DelayPolicy;

/// Drives one session to a target address and returns the rendered content.
///
/// After the browser reports load completion the navigator waits a bounded
/// randomized settle interval before reading content, so deferred scripts get
/// a chance to finish rendering. This is a fixed policy, not adaptive.
pub struct Navigator {
    delays: Arc<dyn DelayPolicy>,
}

impl Navigator {
    pub fn new(delays: Arc<dyn DelayPolicy>) -> Self {
        Self { delays }
    }

    pub async fn navigate(
        &self,
        session: &dyn BrowserSession,
        url: &Url,
        timeout: Duration,
    ) -> SolverResult<String> {
        session.navigate(url.as_str(), timeout).await?;

        let settle = self.delays.settle_interval();
        if !settle.is_zero() {
            debug!("settling {settle:?} before reading content");
            sleep(settle).await;
        }

        session.page_content().await
    }
}
