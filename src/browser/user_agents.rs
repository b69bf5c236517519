//! User-agent candidate pool.
//!
//! The pool is read-only data resolved once per session; there is no
//! cross-session shared mutable state.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::thread_rng;

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default desktop Chrome user agents rotated across sessions.
pub static DEFAULT_USER_AGENTS: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .to_string(),
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .to_string(),
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
            .to_string(),
    ]
});

/// Choose one user agent from `pool`, falling back to a fixed desktop Chrome
/// string when the pool is empty.
pub fn pick_user_agent(pool: &[String]) -> String {
    let mut rng = thread_rng();
    pool.choose(&mut rng)
        .cloned()
        .unwrap_or_else(|| FALLBACK_USER_AGENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_pool() {
        let pool = vec!["only-agent".to_string()];
        assert_eq!(pick_user_agent(&pool), "only-agent");
    }

    #[test]
    fn empty_pool_falls_back() {
        let picked = pick_user_agent(&[]);
        assert!(picked.contains("Chrome"));
    }

    #[test]
    fn default_pool_is_not_empty() {
        assert!(!DEFAULT_USER_AGENTS.is_empty());
        for agent in DEFAULT_USER_AGENTS.iter() {
            assert!(agent.starts_with("Mozilla/5.0"));
        }
    }
}
