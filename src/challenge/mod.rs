//! Challenge detection.
//!
//! Pattern-based classification of rendered page snapshots. Marker matching
//! is a heuristic, not a protocol-level solve: an undetected challenge or a
//! benign page mentioning one of the markers are accepted tradeoffs, which is
//! why the marker list is configurable data rather than hard-coded behavior.

pub mod waiter;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

pub use waiter::{ChallengeWaiter, WaitClear, WaitError};

/// Classification of one page snapshot. Derived purely from the content
/// string; carries no identity or lifecycle beyond the classification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    Clear,
    Challenged,
}

/// Default interstitial markers. The bare "cloudflare" entry is deliberately
/// broad; override the list via [`ChallengeDetector::with_markers`] when that
/// false-positive surface is unacceptable.
pub static DEFAULT_CHALLENGE_MARKERS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "just a moment",
        "checking your browser",
        "verifying you are human",
        "challenge-running",
        "cloudflare",
    ]
});

/// Case-insensitive substring matcher over a fixed marker set.
#[derive(Debug, Clone)]
pub struct ChallengeDetector {
    markers: Vec<Regex>,
}

impl Default for ChallengeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeDetector {
    /// Detector using [`DEFAULT_CHALLENGE_MARKERS`].
    pub fn new() -> Self {
        Self::with_markers(DEFAULT_CHALLENGE_MARKERS.iter().copied())
    }

    /// Detector using a custom marker list. Markers are matched as literal,
    /// case-insensitive substrings.
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|marker| build_marker(marker.as_ref()))
            .collect();
        Self { markers }
    }

    /// Classify a rendered page snapshot. Presence of ANY marker means the
    /// page is still behind a challenge interstitial.
    pub fn classify(&self, content: &str) -> ChallengeState {
        if self.markers.iter().any(|marker| marker.is_match(content)) {
            ChallengeState::Challenged
        } else {
            ChallengeState::Clear
        }
    }
}

fn build_marker(marker: &str) -> Regex {
    RegexBuilder::new(&regex::escape(marker))
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|err| panic!("invalid challenge marker `{}`: {}", marker, err))
}
