//! The document store interface the audit engine reads through.

use vigil_core::entities::{Entity, Kind};

use crate::error::StoreError;
use crate::filter::ScanFilter;

/// Lazy sequence of entities produced by a scan.
pub type EntityIter<'a> = Box<dyn Iterator<Item = Result<Entity, StoreError>> + Send + 'a>;

/// An opaque key-value document store partitioned by kind.
///
/// Implementations must give each scan a consistent snapshot: entities put
/// or deleted after [`DocumentStore::scan`] returns are not observed by that
/// scan. Scans yield entities in ascending id order.
pub trait DocumentStore: Send + Sync {
    /// Every kind the store holds a table for, sorted.
    fn kinds(&self) -> Result<Vec<Kind>, StoreError>;

    /// Whether a table exists for `kind`.
    fn has_kind(&self, kind: &Kind) -> Result<bool, StoreError>;

    /// Fetch one entity by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if `kind` has no table.
    fn get(&self, kind: &Kind, id: &str) -> Result<Option<Entity>, StoreError>;

    /// Insert or replace an entity in its kind's table.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if the entity's kind has no table.
    fn put(&self, entity: Entity) -> Result<(), StoreError>;

    /// Remove an entity. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if `kind` has no table.
    fn delete(&self, kind: &Kind, id: &str) -> Result<bool, StoreError>;

    /// All ids of a kind in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if `kind` has no table.
    fn ids(&self, kind: &Kind) -> Result<Vec<String>, StoreError>;

    /// Scan a kind, restricted by `filter`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if `kind` has no table.
    fn scan(&self, kind: &Kind, filter: &ScanFilter) -> Result<EntityIter<'_>, StoreError>;

    /// Whether an entity exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if `kind` has no table.
    fn exists(&self, kind: &Kind, id: &str) -> Result<bool, StoreError> {
        Ok(self.get(kind, id)?.is_some())
    }
}
