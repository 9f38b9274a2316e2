use std::sync::Arc;

use vigil_core::entities::{Entity, Kind};

use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

type IdParser = Arc<dyn Fn(&str) -> Option<(String, i64)> + Send + Sync>;

/// The version embedded in a versioned model's id must not exceed the
/// current `version` of the parent entity it belongs to.
///
/// Ids whose version cannot be parsed and parents that do not exist are
/// left to the model id and external key checks.
#[derive(Clone)]
pub struct VersionOrder {
    name: String,
    parent: Kind,
    parent_label: String,
    model_label: String,
    parse_id: IdParser,
}

impl VersionOrder {
    /// `parent_label` names the parent in messages ("Exploration") and
    /// `model_label` the versioned model ("snapshot metadata"). Ids are
    /// parsed as `{parent_id}-{version}`.
    #[must_use]
    pub fn new(parent: impl Into<Kind>, parent_label: &str, model_label: &str) -> Self {
        Self {
            name: format!("{} model version check", parent_label.to_lowercase()),
            parent: parent.into(),
            parent_label: parent_label.to_string(),
            model_label: model_label.to_string(),
            parse_id: Arc::new(split_versioned_id),
        }
    }

    /// Use a custom id layout, e.g. `exploration-{parent_id}-{version}`.
    #[must_use]
    pub fn with_id_parser<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> Option<(String, i64)> + Send + Sync + 'static,
    {
        self.parse_id = Arc::new(parse);
        self
    }
}

/// Split `{parent_id}-{version}` at the last dash.
#[must_use]
pub fn split_versioned_id(id: &str) -> Option<(String, i64)> {
    let (parent, version) = id.rsplit_once('-')?;
    if parent.is_empty() {
        return None;
    }
    Some((parent.to_string(), version.parse().ok()?))
}

impl Check for VersionOrder {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        let Some((parent_id, embedded)) = (self.parse_id)(&entity.id) else {
            return Ok(Vec::new());
        };
        let Some(parent) = ctx.resolver.find(&self.parent, &parent_id)? else {
            return Ok(Vec::new());
        };
        let actual = parent.i64_field("version").unwrap_or(0);
        if embedded <= actual {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            &self.name,
            format!(
                "{} model corresponding to id {parent_id} has a version {actual} which is less than the version {embedded} in {} model id",
                self.parent_label, self.model_label
            ),
        )])
    }
}

impl std::fmt::Debug for VersionOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionOrder")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}
