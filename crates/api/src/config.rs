//! HTTP server configuration.

use std::time::Duration;

use jobstatus_infra::ConfigError;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Read from Redis instead of the in-memory store (default: `false`).
    pub use_persistent_stores: bool,
    /// Deadline for a whole request (default: 10s).
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            use_persistent_stores: false,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default   |
    /// |-------------------------|-----------|
    /// | `HOST`                  | `0.0.0.0` |
    /// | `PORT`                  | `8080`    |
    /// | `USE_PERSISTENT_STORES` | `false`   |
    /// | `REQUEST_TIMEOUT_MS`    | `10000`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup("HOST") {
            Some(h) if h.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    var: "HOST",
                    reason: "must not be empty".to_string(),
                });
            }
            Some(h) => h.trim().to_string(),
            None => defaults.host,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let use_persistent_stores = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .map_err(|e| ConfigError::Invalid {
                    var: "USE_PERSISTENT_STORES",
                    reason: e.to_string(),
                })?,
            None => defaults.use_persistent_stores,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                    var: "REQUEST_TIMEOUT_MS",
                    reason: format!("{e}"),
                })?;
                if ms == 0 {
                    return Err(ConfigError::Invalid {
                        var: "REQUEST_TIMEOUT_MS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            host,
            port,
            use_persistent_stores,
            request_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(!config.use_persistent_stores);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn parses_overrides() {
        let config = ApiConfig::from_lookup(|var| match var {
            "PORT" => Some("9000".to_string()),
            "USE_PERSISTENT_STORES" => Some("true".to_string()),
            "REQUEST_TIMEOUT_MS" => Some("250".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 9000);
        assert!(config.use_persistent_stores);
        assert_eq!(config.request_timeout, Duration::from_millis(250));
    }

    #[test]
    fn rejects_blank_host() {
        let err = ApiConfig::from_lookup(|var| (var == "HOST").then(|| "  ".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HOST", .. }));
    }

    #[test]
    fn rejects_bad_port() {
        let err = ApiConfig::from_lookup(|var| (var == "PORT").then(|| "http".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

        let err = ApiConfig::from_lookup(|var| (var == "REQUEST_TIMEOUT_MS").then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "REQUEST_TIMEOUT_MS", .. }));
    }
}
