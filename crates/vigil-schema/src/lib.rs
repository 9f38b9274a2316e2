//! # vigil-schema
//!
//! Commit command schema registry for vigil.
//!
//! Snapshot and commit-log entities carry a `commit_cmds` list of loosely
//! shaped dicts. Each command name maps to a typed payload struct deriving
//! `JsonSchema`; the registry derives the required/optional attribute sets
//! from the generated schema and validates attribute values with `jsonschema`.
//!
//! - [`CommandSchemaRegistry`]: lookup by command name, conformance checks
//! - [`CommandSchema`]: required/optional attributes of one command

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::{CommandCheck, CommandSchema, CommandSchemaRegistry};
