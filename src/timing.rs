//! Delay policies for settle waits and retry backoff.
//!
//! Delays are injected as a capability so the production jittered policy can
//! be swapped for a zero-delay implementation in tests.

use std::time::Duration;

use rand::Rng;
use rand::thread_rng;

/// Source of the randomized waits used by the navigator and the orchestrator.
pub trait DelayPolicy: Send + Sync {
    /// Wait applied after the browser reports load completion, before the
    /// rendered content is read. Gives deferred scripts time to finish.
    fn settle_interval(&self) -> Duration;

    /// Wait applied between failed attempts before a fresh session is created.
    fn retry_backoff(&self) -> Duration;
}

/// Production policy sampling uniformly from bounded millisecond ranges.
#[derive(Debug, Clone)]
pub struct JitteredDelays {
    settle_min_ms: u64,
    settle_max_ms: u64,
    backoff_min_ms: u64,
    backoff_max_ms: u64,
}

impl JitteredDelays {
    pub fn new(settle_ms: (u64, u64), backoff_ms: (u64, u64)) -> Self {
        Self {
            settle_min_ms: settle_ms.0.min(settle_ms.1),
            settle_max_ms: settle_ms.0.max(settle_ms.1),
            backoff_min_ms: backoff_ms.0.min(backoff_ms.1),
            backoff_max_ms: backoff_ms.0.max(backoff_ms.1),
        }
    }

    fn sample(min_ms: u64, max_ms: u64) -> Duration {
        Duration::from_millis(thread_rng().gen_range(min_ms..=max_ms))
    }
}

impl Default for JitteredDelays {
    fn default() -> Self {
        Self::new((2_000, 4_000), (2_000, 4_000))
    }
}

impl DelayPolicy for JitteredDelays {
    fn settle_interval(&self) -> Duration {
        Self::sample(self.settle_min_ms, self.settle_max_ms)
    }

    fn retry_backoff(&self) -> Duration {
        Self::sample(self.backoff_min_ms, self.backoff_max_ms)
    }
}

/// Zero-delay policy so test suites never sleep for real.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelays;

impl DelayPolicy for NoDelays {
    fn settle_interval(&self) -> Duration {
        Duration::ZERO
    }

    fn retry_backoff(&self) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jittered_delays_stay_within_bounds() {
        let delays = JitteredDelays::new((100, 200), (300, 500));
        for _ in 0..50 {
            let settle = delays.settle_interval();
            assert!(settle >= Duration::from_millis(100));
            assert!(settle <= Duration::from_millis(200));

            let backoff = delays.retry_backoff();
            assert!(backoff >= Duration::from_millis(300));
            assert!(backoff <= Duration::from_millis(500));
        }
    }

    #[test]
    fn inverted_bounds_are_normalized() {
        let delays = JitteredDelays::new((400, 100), (100, 100));
        let settle = delays.settle_interval();
        assert!(settle >= Duration::from_millis(100));
        assert!(settle <= Duration::from_millis(400));
        assert_eq!(delays.retry_backoff(), Duration::from_millis(100));
    }

    #[test]
    fn no_delays_is_instant() {
        assert_eq!(NoDelays.settle_interval(), Duration::ZERO);
        assert_eq!(NoDelays.retry_backoff(), Duration::ZERO);
    }
}
