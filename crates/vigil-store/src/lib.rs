//! # vigil-store
//!
//! Read access to the document store an audit runs against.
//!
//! The audit engine needs only a narrow view of storage: get-by-id, put,
//! delete, and kind-scoped scans. [`DocumentStore`] is that view;
//! [`MemoryStore`] is a snapshot-consistent in-memory implementation that can
//! be loaded from and dumped to per-kind JSONL files.
//!
//! On top of the store sit [`EntityStream`] (the lazy kind scan an audit
//! shard consumes) and [`ReferenceResolver`] (cached existence lookups for
//! cross-kind checks).

pub mod error;
pub mod filter;
pub mod jsonl;
pub mod memory;
pub mod resolver;
pub mod retry;
pub mod store;
pub mod stream;

#[cfg(test)]
mod test_support;

pub use error::StoreError;
pub use filter::{IdRange, ScanFilter, TimeWindow};
pub use memory::MemoryStore;
pub use resolver::ReferenceResolver;
pub use retry::RetryConfig;
pub use store::{DocumentStore, EntityIter};
pub use stream::EntityStream;
