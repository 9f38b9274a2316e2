//! Audit error types for vigil-audit.
//!
//! These cover programming and infrastructure faults only. A failing check is
//! not an error; it is a [`Finding`](crate::check::Finding).

use thiserror::Error;
use vigil_core::errors::CoreError;
use vigil_store::StoreError;

/// Errors from building rule sets or running audits.
#[derive(Debug, Error)]
pub enum AuditError {
    /// No rule set is registered for the kind.
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    /// A kind was registered twice.
    #[error("Kind already registered: {0}")]
    DuplicateKind(String),

    /// Two checks in one rule set share a name.
    #[error("Duplicate check name: {0}")]
    DuplicateCheck(String),

    /// An id pattern failed to compile.
    #[error("Invalid id pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An entity was handed to the rule set of another kind.
    #[error("Entity {id} of kind {actual} validated against rules for {expected}")]
    KindMismatch {
        id: String,
        expected: String,
        actual: String,
    },

    /// A check hit a condition outside its contract.
    #[error("Check '{check}' failed on {kind} {id}: {reason}")]
    Check {
        kind: String,
        id: String,
        check: String,
        reason: String,
    },

    /// Job id lookup returned nothing.
    #[error("Audit job not found: {0}")]
    JobNotFound(String),

    /// Output was requested before the job finished.
    #[error("Audit job {id} has not completed (status: {status})")]
    JobNotComplete { id: String, status: String },

    /// The job failed; `reason` is the fatal shard error.
    #[error("Audit job {id} failed: {reason}")]
    JobFailed { id: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuditError {
    /// Whether re-running the failed shard may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }
}
