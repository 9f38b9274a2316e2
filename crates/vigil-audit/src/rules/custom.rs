use std::sync::Arc;

use vigil_core::entities::Entity;

use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

type CustomFn =
    Arc<dyn Fn(&Entity, &CheckContext<'_>) -> Result<Vec<String>, AuditError> + Send + Sync>;

/// A kind-specific check backed by a closure returning failure messages.
#[derive(Clone)]
pub struct Custom {
    name: String,
    check: CustomFn,
}

impl Custom {
    #[must_use]
    pub fn new<F>(name: &str, check: F) -> Self
    where
        F: Fn(&Entity, &CheckContext<'_>) -> Result<Vec<String>, AuditError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.to_string(),
            check: Arc::new(check),
        }
    }
}

impl Check for Custom {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        Ok((self.check)(entity, ctx)?
            .into_iter()
            .map(|message| Finding::new(&self.name, message))
            .collect())
    }
}

impl std::fmt::Debug for Custom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Custom")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
