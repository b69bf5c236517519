//! Environment-derived process configuration.
//!
//! Read once at startup and never mutated afterwards; the only process-wide
//! shared state in the service.

/// Startup configuration for the service binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening port (`PORT`, default 8191).
    pub port: u16,
    /// Instance label echoed in every response (`INSTANCE_NAME`).
    pub instance: String,
    /// Optional upstream proxy handed to every browser session
    /// (`UPSTREAM_PROXY`, falling back to `HTTP_PROXY`).
    pub proxy: Option<String>,
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 8191;
    pub const DEFAULT_INSTANCE: &'static str = "solvarr";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Split out from
    /// [`AppConfig::from_env`] so tests don't have to mutate process env.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(Self::DEFAULT_PORT);

        let instance = lookup("INSTANCE_NAME")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_INSTANCE.to_string());

        let proxy = lookup("UPSTREAM_PROXY")
            .or_else(|| lookup("HTTP_PROXY"))
            .filter(|value| !value.is_empty());

        Self {
            port,
            instance,
            proxy,
        }
    }
}
