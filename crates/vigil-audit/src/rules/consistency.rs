use serde_json::Value;
use vigil_core::entities::{Entity, Kind};

use super::{RefSource, display_value};
use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// A denormalized field must equal the authoritative field on its source
/// entity.
///
/// Missing source entities are left to the external key check. An absent
/// field compares equal to `null`.
#[derive(Debug, Clone)]
pub struct FieldConsistency {
    name: String,
    field: String,
    source_kind: Kind,
    source_label: String,
    source_field: String,
    link: RefSource,
}

impl FieldConsistency {
    /// Compare `field` with `source_field` of the `source_kind` entity
    /// found through `link`. `source_label` names the source in messages
    /// ("exploration").
    #[must_use]
    pub fn new(
        field: &str,
        source_kind: impl Into<Kind>,
        source_label: &str,
        source_field: &str,
        link: RefSource,
    ) -> Self {
        Self {
            name: format!("{field} field check"),
            field: field.to_string(),
            source_kind: source_kind.into(),
            source_label: source_label.to_string(),
            source_field: source_field.to_string(),
            link,
        }
    }

    /// Override the default `{field} field check` name.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Check for FieldConsistency {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        let local = entity.field(&self.field).unwrap_or(&Value::Null);
        let mut findings = Vec::new();
        for source_id in self.link.ids(entity) {
            let Some(source) = ctx.resolver.find(&self.source_kind, &source_id)? else {
                continue;
            };
            let authoritative = source.field(&self.source_field).unwrap_or(&Value::Null);
            if local != authoritative {
                findings.push(Finding::new(
                    &self.name,
                    format!(
                        "{} field in entity: {} does not match corresponding {} {} field: {}",
                        self.field,
                        display_value(local),
                        self.source_label,
                        self.source_field,
                        display_value(authoritative)
                    ),
                ));
            }
        }
        Ok(findings)
    }
}
