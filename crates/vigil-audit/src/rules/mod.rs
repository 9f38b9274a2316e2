//! Reusable, parameterized check templates.
//!
//! Every kind's rule set is assembled from these; kind-specific code is
//! limited to choosing parameters and, where nothing fits, a [`Custom`]
//! closure.

mod commit;
mod consistency;
mod custom;
mod domain;
mod external;
mod model_id;
mod range;
mod set;
mod time;
mod version;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use vigil_core::entities::Entity;
use vigil_core::pyrepr::{repr_float, repr_value};

pub use commit::CommitCommands;
pub use consistency::FieldConsistency;
pub use custom::Custom;
pub use domain::{DomainError, DomainObject, DomainValidator};
pub use external::ExternalKey;
pub use model_id::ModelIdPattern;
pub use range::RangeCheck;
pub use set::{SetComparison, SetMode};
pub use time::{CurrentTime, TimeFieldRelation};
pub use version::{VersionOrder, split_versioned_id};

/// Function deriving referenced ids from an entity.
pub type DeriveIds = Arc<dyn Fn(&Entity) -> Vec<String> + Send + Sync>;

/// Where a check reads the id(s) of the entity it references.
#[derive(Clone)]
pub enum RefSource {
    /// The entity's own id (summary and rights models share their
    /// exploration's id).
    EntityId,
    /// A scalar or list-valued field.
    Field(String),
    /// Ids computed from the entity, e.g. one snapshot id per version.
    Derived(DeriveIds),
}

impl RefSource {
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    #[must_use]
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&Entity) -> Vec<String> + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(f))
    }

    /// All referenced ids, in source order.
    #[must_use]
    pub fn ids(&self, entity: &Entity) -> Vec<String> {
        match self {
            Self::EntityId => vec![entity.id.clone()],
            Self::Field(name) => entity.id_values(name),
            Self::Derived(f) => f(entity),
        }
    }
}

impl fmt::Debug for RefSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityId => f.write_str("EntityId"),
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Render a field value the way `%s` formatting of the decoded value would:
/// strings bare, everything else as its literal.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => repr_value(other),
    }
}

/// Render a bound without a trailing `.0` when it is integral.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        repr_float(n)
    }
}
