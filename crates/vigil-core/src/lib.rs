//! # vigil-core
//!
//! Core types shared by every vigil crate.
//!
//! - Entity and kind types for records read from the document store
//! - Job status state machine and job id generation
//! - Python-style `repr` encoding used by the report line format
//! - Report line types and their bit-exact string encoding
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod pyrepr;
pub mod report;
pub mod time;
