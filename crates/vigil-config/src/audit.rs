//! Audit job configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_max_errors_per_check() -> usize {
    10
}

const fn default_sort_output() -> bool {
    true
}

const fn default_shard_count() -> usize {
    4
}

const fn default_max_shard_attempts() -> u32 {
    3
}

const fn default_retry_base_delay_ms() -> u64 {
    50
}

const fn default_retry_max_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Messages retained per failing check before further ones are dropped.
    #[serde(default = "default_max_errors_per_check")]
    pub max_errors_per_check: usize,

    /// Sort report lines lexicographically by their encoded form.
    #[serde(default = "default_sort_output")]
    pub sort_output: bool,

    /// Upper bound on shards planned per kind.
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,

    /// Worker threads for shard execution. `0` uses the rayon default.
    #[serde(default)]
    pub workers: usize,

    /// Attempts per shard when the store reports a transient failure.
    #[serde(default = "default_max_shard_attempts")]
    pub max_shard_attempts: u32,

    /// Backoff before the first shard retry, in milliseconds.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Backoff cap between shard retries, in milliseconds.
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

impl AuditConfig {
    /// Reject values the job runner cannot operate with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_errors_per_check == 0 {
            return Err(invalid("audit.max_errors_per_check", "must be at least 1"));
        }
        if self.shard_count == 0 {
            return Err(invalid("audit.shard_count", "must be at least 1"));
        }
        if self.max_shard_attempts == 0 {
            return Err(invalid("audit.max_shard_attempts", "must be at least 1"));
        }
        if self.retry_base_delay_ms > self.retry_max_delay_ms {
            return Err(invalid(
                "audit.retry_base_delay_ms",
                "must not exceed audit.retry_max_delay_ms",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    #[must_use]
    pub const fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_errors_per_check: default_max_errors_per_check(),
            sort_output: default_sort_output(),
            shard_count: default_shard_count(),
            workers: 0,
            max_shard_attempts: default_max_shard_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}
