use vigil_core::entities::{Entity, Kind};

use super::RefSource;
use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// Every id referenced by a field must name an existing entity of `target`.
///
/// List-valued fields are checked element by element and produce one
/// finding per missing id.
#[derive(Debug, Clone)]
pub struct ExternalKey {
    name: String,
    label: String,
    target: Kind,
    source: RefSource,
}

impl ExternalKey {
    /// Reference ids read from `field`.
    #[must_use]
    pub fn field(field: &str, target: impl Into<Kind>) -> Self {
        Self::new(field, target, RefSource::field(field))
    }

    /// Reference ids computed from the entity. `label` stands in for the
    /// field name in the check name and messages.
    #[must_use]
    pub fn derived<F>(label: &str, target: impl Into<Kind>, derive: F) -> Self
    where
        F: Fn(&Entity) -> Vec<String> + Send + Sync + 'static,
    {
        Self::new(label, target, RefSource::derived(derive))
    }

    fn new(label: &str, target: impl Into<Kind>, source: RefSource) -> Self {
        Self {
            name: format!("{label} field check"),
            label: label.to_string(),
            target: target.into(),
            source,
        }
    }

    #[must_use]
    pub const fn target(&self) -> &Kind {
        &self.target
    }
}

impl Check for ExternalKey {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        let ids = self.source.ids(entity);
        let missing = ctx.resolver.missing(&self.target, ids.as_slice())?;
        Ok(missing
            .into_iter()
            .map(|id| {
                Finding::new(
                    &self.name,
                    format!(
                        "based on field {} having value {id}, expected model {} with id {id} but it doesn't exist",
                        self.label, self.target
                    ),
                )
            })
            .collect())
    }
}
