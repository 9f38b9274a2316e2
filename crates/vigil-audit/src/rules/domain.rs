use std::sync::Arc;

use thiserror::Error;
use vigil_core::entities::Entity;

use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// A domain object rejected by its own validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DomainError(pub String);

impl DomainError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Rebuilds the product's domain object from a persisted entity and runs
/// its structural validation.
pub trait DomainValidator: Send + Sync {
    /// # Errors
    ///
    /// Returns `DomainError` carrying the validation message when the
    /// domain object is invalid or cannot be built.
    fn validate(&self, entity: &Entity) -> Result<(), DomainError>;
}

impl<F> DomainValidator for F
where
    F: Fn(&Entity) -> Result<(), DomainError> + Send + Sync,
{
    fn validate(&self, entity: &Entity) -> Result<(), DomainError> {
        self(entity)
    }
}

/// Reports entities whose domain object fails validation.
#[derive(Clone)]
pub struct DomainObject {
    validator: Arc<dyn DomainValidator>,
}

impl DomainObject {
    pub const NAME: &'static str = "domain object check";

    #[must_use]
    pub fn new(validator: impl DomainValidator + 'static) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }
}

impl Check for DomainObject {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, entity: &Entity, _ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        Ok(match self.validator.validate(entity) {
            Ok(()) => Vec::new(),
            Err(e) => vec![Finding::new(
                Self::NAME,
                format!("Entity fails domain validation with the error {e}"),
            )],
        })
    }
}

impl std::fmt::Debug for DomainObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainObject").finish_non_exhaustive()
    }
}
