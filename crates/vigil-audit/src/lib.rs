//! # vigil-audit
//!
//! Rule-driven audit engine for document store snapshots.
//!
//! - [`check`]: the [`Check`] trait and the context checks read through
//! - [`rules`]: parameterized check templates (time fields, id patterns,
//!   external keys, versions, commit commands, domain objects, consistency,
//!   ranges, set comparisons, custom closures)
//! - [`registry`]: per-kind rule sets keyed by [`Kind`](vigil_core::entities::Kind)
//! - [`validator`]: applies one kind's rules to one entity
//! - [`aggregate`]: capped, deduplicated merge of check outcomes
//! - [`shard`]: shard planning and retrying shard execution
//! - [`job`]: the audit job lifecycle

pub mod aggregate;
pub mod check;
pub mod error;
pub mod job;
pub mod registry;
pub mod rules;
pub mod ruleset;
pub mod settings;
pub mod shard;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use aggregate::ResultAggregator;
pub use check::{Check, CheckContext, Finding};
pub use error::AuditError;
pub use job::{AuditJobs, JobSpec};
pub use registry::{KindRegistry, KindSpec, KindSpecBuilder};
pub use ruleset::RuleSet;
pub use settings::AuditSettings;
pub use validator::{Validator, Verdict};
