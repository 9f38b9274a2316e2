//! The check abstraction every rule template implements.

use chrono::{DateTime, Utc};
use vigil_core::entities::Entity;
use vigil_store::ReferenceResolver;

use crate::error::AuditError;

/// Read-only context shared by every check run within one shard.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Cached lookups for cross-kind references.
    pub resolver: &'a ReferenceResolver<'a>,
    /// When the audit job started. Timestamps after this are in the future.
    pub run_started_at: DateTime<Utc>,
}

/// One failed check on one entity.
///
/// `check` is the report grouping key. It is usually the name of the check
/// that produced the finding, but a check may group findings under
/// sub-names (one per commit command type, for instance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: String,
    pub message: String,
}

impl Finding {
    #[must_use]
    pub fn new(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
        }
    }
}

/// A named, pure validation of one entity.
///
/// A check returns an empty vector when the entity passes. It never
/// mutates anything, and it returns `Err` only for faults outside its
/// contract (a store failure, a malformed configuration); an entity that
/// simply fails the check produces findings, not an error.
pub trait Check: Send + Sync {
    /// Stable, per-kind unique name used to group findings in the report.
    fn name(&self) -> &str;

    /// Run the check against `entity`.
    ///
    /// # Errors
    ///
    /// Returns `AuditError` on faults outside the check's contract.
    fn run(&self, entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError>;
}

impl std::fmt::Debug for dyn Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Check").field(&self.name()).finish()
    }
}
