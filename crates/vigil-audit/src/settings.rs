//! Runtime knobs of the audit engine, derived from `[audit]` configuration.

use vigil_config::AuditConfig;
use vigil_store::RetryConfig;

use crate::aggregate::DEFAULT_MAX_ERRORS_PER_CHECK;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSettings {
    /// Messages retained per failing check.
    pub max_errors_per_check: usize,
    /// Sort report lines unless a job says otherwise.
    pub sort_output: bool,
    /// Upper bound on shards per kind.
    pub shard_count: usize,
    /// Worker threads; `0` lets rayon decide.
    pub workers: usize,
    /// Retry policy for shards hitting transient store failures.
    pub retry: RetryConfig,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            max_errors_per_check: DEFAULT_MAX_ERRORS_PER_CHECK,
            sort_output: true,
            shard_count: 4,
            workers: 0,
            retry: RetryConfig::default(),
        }
    }
}

impl From<&AuditConfig> for AuditSettings {
    fn from(config: &AuditConfig) -> Self {
        Self {
            max_errors_per_check: config.max_errors_per_check,
            sort_output: config.sort_output,
            shard_count: config.shard_count,
            workers: config.workers,
            retry: RetryConfig {
                max_attempts: config.max_shard_attempts,
                base_delay: config.retry_base_delay(),
                max_delay: config.retry_max_delay(),
            },
        }
    }
}
