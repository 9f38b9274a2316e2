use regex::Regex;
use vigil_core::entities::Entity;

use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// Fails when the entity id does not match the kind's id pattern.
///
/// The pattern is anchored at the start of the id only; patterns that must
/// consume the whole id end in `$`.
#[derive(Debug, Clone)]
pub struct ModelIdPattern {
    pattern: String,
    regex: Regex,
}

impl ModelIdPattern {
    pub const NAME: &'static str = "model id check";

    /// # Errors
    ///
    /// Returns `AuditError::InvalidPattern` if `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, AuditError> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|e| {
            AuditError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.regex.is_match(id)
    }
}

impl Check for ModelIdPattern {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, entity: &Entity, _ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        if self.matches(&entity.id) {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            Self::NAME,
            "Entity id does not match regex pattern",
        )])
    }
}
