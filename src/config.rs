use {
    crate::source::southwest::DEFAULT_BASE_URL,
    std::{env, time::Duration},
};

/// Runtime knobs loaded from environment variables
///
/// Trip settings live in `settings`; this only covers how the process runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// JSON trip settings file, used when `--settings` is not given
    pub settings_path: Option<String>,
    /// Booking site root (overridable for staging or local fixtures)
    pub base_url: String,
    /// Upper bound on one fare fetch; unset waits indefinitely
    pub fetch_timeout: Option<Duration>,
    pub rust_log: Option<String>,
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `FAREWATCH_SETTINGS` (default: unset, falls back to `FAREWATCH_*` trip variables)
    /// - `FAREWATCH_BASE_URL` (default: https://www.southwest.com)
    /// - `FAREWATCH_FETCH_TIMEOUT_SECS` (default: unset)
    /// - `RUST_LOG`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let fetch_timeout = non_empty("FAREWATCH_FETCH_TIMEOUT_SECS").and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    log::warn!(
                        "Invalid FAREWATCH_FETCH_TIMEOUT_SECS '{}', fetches will not time out",
                        raw
                    );
                    None
                }
            }
        });

        Self {
            settings_path: non_empty("FAREWATCH_SETTINGS"),
            base_url: non_empty("FAREWATCH_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            fetch_timeout,
            rust_log: non_empty("RUST_LOG"),
        }
    }
}
