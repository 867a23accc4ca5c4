//! Client configuration: base address and transport timeouts.
//!
//! # Environment variables
//!
//! | Variable                    | Default                 |
//! |-----------------------------|-------------------------|
//! | `MOVIES_BASE_URL`           | `http://localhost:8081` |
//! | `MOVIES_CONNECT_TIMEOUT_MS` | `5000`                  |
//! | `MOVIES_READ_TIMEOUT_MS`    | `5000`                  |
//! | `MOVIES_WRITE_TIMEOUT_MS`   | `5000`                  |

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

/// Default for each of the three transport timeouts.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything a `MoviesClient` needs from its environment. Each client owns
/// its own copy; nothing here is process-global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            write_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Same timeout for connect, read and write.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.read_timeout = timeout;
        self.write_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Load from the process environment. Unset variables fall back to the
    /// defaults; set but unparseable ones are an error.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let defaults = Self::default();
        let millis = |key: &str, default: Duration| -> Result<Duration, ApiError> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ApiError::Config(format!("{key}={raw:?}: {e}"))),
                None => Ok(default),
            }
        };

        Ok(Self {
            base_url: lookup("MOVIES_BASE_URL").unwrap_or(defaults.base_url),
            connect_timeout: millis("MOVIES_CONNECT_TIMEOUT_MS", defaults.connect_timeout)?,
            read_timeout: millis("MOVIES_READ_TIMEOUT_MS", defaults.read_timeout)?,
            write_timeout: millis("MOVIES_WRITE_TIMEOUT_MS", defaults.write_timeout)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn environment_overrides_each_field() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("MOVIES_BASE_URL", "http://movies.internal:9000"),
            ("MOVIES_CONNECT_TIMEOUT_MS", "250"),
            ("MOVIES_READ_TIMEOUT_MS", " 1500 "),
            ("MOVIES_WRITE_TIMEOUT_MS", "750"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://movies.internal:9000");
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.read_timeout, Duration::from_millis(1500));
        assert_eq!(config.write_timeout, Duration::from_millis(750));
    }

    #[test]
    fn unparseable_timeout_is_a_config_error() {
        let err = ClientConfig::from_lookup(lookup_from(&[("MOVIES_READ_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(msg) if msg.contains("MOVIES_READ_TIMEOUT_MS")));
    }

    #[test]
    fn builders_set_timeouts() {
        let config = ClientConfig::new("http://localhost:1")
            .with_timeout(Duration::from_secs(1))
            .with_read_timeout(Duration::from_millis(100))
            .with_connect_timeout(Duration::from_millis(50));
        assert_eq!(config.connect_timeout, Duration::from_millis(50));
        assert_eq!(config.write_timeout, Duration::from_secs(1));
        assert_eq!(config.read_timeout, Duration::from_millis(100));
    }
}
