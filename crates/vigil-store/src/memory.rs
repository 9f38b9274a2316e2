//! In-memory snapshot store.
//!
//! Each kind is a table `id -> Entity` held behind an `Arc`. Writers clone a
//! table only while a scan still holds the previous version, so every scan
//! reads a consistent snapshot without blocking writers.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use vigil_core::entities::{Entity, Kind};

use crate::error::StoreError;
use crate::filter::ScanFilter;
use crate::store::{DocumentStore, EntityIter};

type Table = BTreeMap<String, Entity>;
type Tables = BTreeMap<Kind, Arc<Table>>;

/// Snapshot-consistent in-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with empty tables for `kinds`.
    #[must_use]
    pub fn with_kinds<I, K>(kinds: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Kind>,
    {
        let tables = kinds
            .into_iter()
            .map(|k| (k.into(), Arc::new(Table::new())))
            .collect();
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Create an empty table for `kind`. Returns `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Other` if the table lock is poisoned.
    pub fn register_kind(&self, kind: impl Into<Kind>) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let kind = kind.into();
        if tables.contains_key(&kind) {
            return Ok(false);
        }
        tables.insert(kind, Arc::new(Table::new()));
        Ok(true)
    }

    /// Number of entities stored for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if `kind` has no table.
    pub fn count(&self, kind: &Kind) -> Result<usize, StoreError> {
        Ok(self.table(kind)?.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Other(anyhow::anyhow!("store table lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Other(anyhow::anyhow!("store table lock poisoned")))
    }

    fn table(&self, kind: &Kind) -> Result<Arc<Table>, StoreError> {
        self.read()?
            .get(kind)
            .cloned()
            .ok_or_else(|| StoreError::UnknownKind(kind.to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn kinds(&self) -> Result<Vec<Kind>, StoreError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn has_kind(&self, kind: &Kind) -> Result<bool, StoreError> {
        Ok(self.read()?.contains_key(kind))
    }

    fn get(&self, kind: &Kind, id: &str) -> Result<Option<Entity>, StoreError> {
        Ok(self.table(kind)?.get(id).cloned())
    }

    fn put(&self, entity: Entity) -> Result<(), StoreError> {
        if entity.id.is_empty() {
            return Err(StoreError::InvalidEntity(format!(
                "{} entity has an empty id",
                entity.kind
            )));
        }
        let mut tables = self.write()?;
        let table = tables
            .get_mut(&entity.kind)
            .ok_or_else(|| StoreError::UnknownKind(entity.kind.to_string()))?;
        Arc::make_mut(table).insert(entity.id.clone(), entity);
        Ok(())
    }

    fn delete(&self, kind: &Kind, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        let table = tables
            .get_mut(kind)
            .ok_or_else(|| StoreError::UnknownKind(kind.to_string()))?;
        if !table.contains_key(id) {
            return Ok(false);
        }
        Ok(Arc::make_mut(table).remove(id).is_some())
    }

    fn ids(&self, kind: &Kind) -> Result<Vec<String>, StoreError> {
        Ok(self.table(kind)?.keys().cloned().collect())
    }

    fn scan(&self, kind: &Kind, filter: &ScanFilter) -> Result<EntityIter<'_>, StoreError> {
        let table = self.table(kind)?;
        Ok(Box::new(SnapshotScan {
            table,
            filter: filter.clone(),
            cursor: None,
            done: filter.range.is_empty(),
        }))
    }
}

/// Lazy walk over one table snapshot in id order.
struct SnapshotScan {
    table: Arc<Table>,
    filter: ScanFilter,
    cursor: Option<String>,
    done: bool,
}

impl Iterator for SnapshotScan {
    type Item = Result<Entity, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let (start, end) = self.filter.range.bounds();
            let lower = self
                .cursor
                .as_deref()
                .map_or(start, Bound::Excluded);
            let Some((id, entity)) = self.table.range::<str, _>((lower, end)).next() else {
                self.done = true;
                break;
            };
            self.cursor = Some(id.clone());
            if self.filter.window.contains(&entity.last_updated) {
                return Some(Ok(entity.clone()));
            }
        }
        None
    }
}
