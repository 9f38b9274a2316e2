//! Cached cross-kind reference lookups.
//!
//! Many entities in one shard usually reference the same few parents (every
//! snapshot of an exploration points at that exploration), so lookups are
//! memoised for the lifetime of the resolver. A resolver is meant to live for
//! one shard and is not shared across threads.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use vigil_core::entities::{Entity, Kind};

use crate::error::StoreError;
use crate::store::DocumentStore;

/// Existence and fetch lookups against a [`DocumentStore`].
pub struct ReferenceResolver<'a> {
    store: &'a dyn DocumentStore,
    cache: RefCell<HashMap<(Kind, String), Option<Entity>>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<'a> ReferenceResolver<'a> {
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            cache: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Fetch an entity if it exists.
    ///
    /// # Errors
    ///
    /// Propagates store failures, including `StoreError::UnknownKind`.
    pub fn find(&self, kind: &Kind, id: &str) -> Result<Option<Entity>, StoreError> {
        let key = (kind.clone(), id.to_string());
        if let Some(cached) = self.cache.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return Ok(cached.clone());
        }

        self.misses.set(self.misses.get() + 1);
        let found = self.store.get(kind, id)?;
        self.cache.borrow_mut().insert(key, found.clone());
        Ok(found)
    }

    /// Fetch an entity that must exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if it does not.
    pub fn get(&self, kind: &Kind, id: &str) -> Result<Entity, StoreError> {
        self.find(kind, id)?.ok_or_else(|| StoreError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        })
    }

    /// Whether an entity exists.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn exists(&self, kind: &Kind, id: &str) -> Result<bool, StoreError> {
        Ok(self.find(kind, id)?.is_some())
    }

    /// The subset of `ids` with no entity of `kind`, in input order.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn missing<S: AsRef<str>>(&self, kind: &Kind, ids: &[S]) -> Result<Vec<String>, StoreError> {
        let mut missing = Vec::new();
        for id in ids {
            if !self.exists(kind, id.as_ref())? {
                missing.push(id.as_ref().to_string());
            }
        }
        Ok(missing)
    }

    /// `(cache hits, store reads)` since creation.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits.get(), self.misses.get())
    }
}

impl std::fmt::Debug for ReferenceResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver")
            .field("cached", &self.cache.borrow().len())
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::populated_store;

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let store = populated_store();
        let resolver = ReferenceResolver::new(&store);
        let kind = Kind::new("ExplorationModel");

        assert!(resolver.exists(&kind, "1").unwrap());
        assert!(resolver.exists(&kind, "1").unwrap());
        assert!(!resolver.exists(&kind, "42").unwrap());
        assert!(!resolver.exists(&kind, "42").unwrap());
        assert_eq!(resolver.stats(), (2, 2));
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = populated_store();
        let resolver = ReferenceResolver::new(&store);
        let err = resolver
            .get(&Kind::new("ExplorationModel"), "42")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref id, .. } if id == "42"));
        assert_eq!(
            resolver
                .get(&Kind::new("ExplorationModel"), "2")
                .unwrap()
                .i64_field("version"),
            Some(1)
        );
    }

    #[test]
    fn missing_reports_each_absent_id_in_order() {
        let store = populated_store();
        let resolver = ReferenceResolver::new(&store);
        let missing = resolver
            .missing(&Kind::new("ExplorationModel"), &["7", "0", "5", "7"])
            .unwrap();
        assert_eq!(missing, vec!["7", "5", "7"]);
    }

    #[test]
    fn unknown_kind_propagates() {
        let store = populated_store();
        let resolver = ReferenceResolver::new(&store);
        assert!(matches!(
            resolver.exists(&Kind::new("TopicModel"), "t1"),
            Err(StoreError::UnknownKind(_))
        ));
    }
}
