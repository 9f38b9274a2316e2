//! Kind-scoped entity streams.

use vigil_core::entities::{Entity, Kind};

use crate::error::StoreError;
use crate::filter::ScanFilter;
use crate::store::{DocumentStore, EntityIter};

/// Lazy stream over the entities of one kind.
///
/// A stream is finite and reads one snapshot. It cannot be rewound, but
/// opening a new stream with the same kind and filter on an unchanged store
/// yields the same entities in the same order.
pub struct EntityStream<'a> {
    kind: Kind,
    inner: EntityIter<'a>,
    yielded: u64,
}

impl<'a> EntityStream<'a> {
    /// Open a stream over `kind`, restricted by `filter`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownKind` if the store has no table for `kind`.
    pub fn open(
        store: &'a dyn DocumentStore,
        kind: &Kind,
        filter: &ScanFilter,
    ) -> Result<Self, StoreError> {
        if !store.has_kind(kind)? {
            return Err(StoreError::UnknownKind(kind.to_string()));
        }
        let inner = store.scan(kind, filter)?;
        Ok(Self {
            kind: kind.clone(),
            inner,
            yielded: 0,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Entities yielded so far.
    #[must_use]
    pub const fn yielded(&self) -> u64 {
        self.yielded
    }
}

impl Iterator for EntityStream<'_> {
    type Item = Result<Entity, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        if item.is_ok() {
            self.yielded += 1;
        }
        Some(item)
    }
}

impl std::fmt::Debug for EntityStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStream")
            .field("kind", &self.kind)
            .field("yielded", &self.yielded)
            .finish_non_exhaustive()
    }
}
