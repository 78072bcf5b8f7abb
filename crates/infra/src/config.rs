//! Job store configuration.

use std::time::Duration;

use thiserror::Error;

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Where the broker keeps its views and how long a store call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Redis connection URL.
    pub redis_url: String,
    /// Name of the pending list.
    pub queue_name: String,
    /// Prefix of result keys (`"<namespace>-<job id>"`).
    pub result_namespace: String,
    /// Name of the unacknowledged hash.
    pub unacked_key: String,
    /// Deadline for a single store round trip.
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            queue_name: "celery".to_string(),
            result_namespace: "celery-task-meta".to_string(),
            unacked_key: "unacked".to_string(),
            timeout: Duration::from_millis(2000),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default                  |
    /// |--------------------|--------------------------|
    /// | `REDIS_URL`        | `redis://localhost:6379` |
    /// | `QUEUE_NAME`       | `celery`                 |
    /// | `RESULT_NAMESPACE` | `celery-task-meta`       |
    /// | `UNACKED_KEY`      | `unacked`                |
    /// | `STORE_TIMEOUT_MS` | `2000`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout = match lookup("STORE_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                    var: "STORE_TIMEOUT_MS",
                    reason: format!("{e}"),
                })?;
                if ms == 0 {
                    return Err(ConfigError::Invalid {
                        var: "STORE_TIMEOUT_MS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => defaults.timeout,
        };

        let non_empty = |var: &'static str, default: String| -> Result<String, ConfigError> {
            match lookup(var) {
                Some(v) if v.trim().is_empty() => Err(ConfigError::Invalid {
                    var,
                    reason: "must not be empty".to_string(),
                }),
                Some(v) => Ok(v.trim().to_string()),
                None => Ok(default),
            }
        };

        Ok(Self {
            redis_url: non_empty("REDIS_URL", defaults.redis_url)?,
            queue_name: non_empty("QUEUE_NAME", defaults.queue_name)?,
            result_namespace: non_empty("RESULT_NAMESPACE", defaults.result_namespace)?,
            unacked_key: non_empty("UNACKED_KEY", defaults.unacked_key)?,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = StoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("QUEUE_NAME", " renders "),
            ("STORE_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.queue_name, "renders");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.result_namespace, "celery-task-meta");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[("STORE_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STORE_TIMEOUT_MS", .. }));

        let err = StoreConfig::from_lookup(lookup_from(&[("STORE_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STORE_TIMEOUT_MS", .. }));

        let err = StoreConfig::from_lookup(lookup_from(&[("UNACKED_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "UNACKED_KEY", .. }));
    }
}
