use thiserror::Error;
use vigil_audit::AuditError;
use vigil_schema::SchemaError;

/// Errors raised while assembling the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
