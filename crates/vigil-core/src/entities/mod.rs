//! Entity and kind types for records read from the document store.
//!
//! The auditor never interprets kind-specific fields itself; it reads them
//! through the accessors on [`Entity`] and leaves meaning to the rule sets.

mod entity;
mod kind;

pub use entity::Entity;
pub use kind::Kind;
