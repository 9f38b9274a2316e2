//! Store error types for vigil-store.

use thiserror::Error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The kind has never been registered with the store.
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    /// A required entity does not exist.
    #[error("Entity not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    /// A put carried an entity whose kind does not match the target table.
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// A snapshot file could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot record could not be decoded.
    #[error("Malformed record in {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// A failure that is expected to clear on its own (lock contention,
    /// a recycled backend node). Safe to retry.
    #[error("Transient store failure: {0}")]
    Transient(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Whether retrying the failed operation may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
