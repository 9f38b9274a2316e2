use serde_json::Value;
use vigil_core::entities::Entity;
use vigil_core::pyrepr::repr_value;

use super::display_number;
use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// A numeric field must lie within inclusive bounds.
///
/// An absent or `null` field passes; make the field required through the
/// domain object check if it must be present.
#[derive(Debug, Clone)]
pub struct RangeCheck {
    name: String,
    field: String,
    min: Option<f64>,
    max: Option<f64>,
}

impl RangeCheck {
    /// `field` must be within `[min, max]`.
    #[must_use]
    pub fn between(field: &str, min: f64, max: f64) -> Self {
        Self::new(field, Some(min), Some(max))
    }

    /// `field` must be at least `min`.
    #[must_use]
    pub fn at_least(field: &str, min: f64) -> Self {
        Self::new(field, Some(min), None)
    }

    /// `field` must be at most `max`.
    #[must_use]
    pub fn at_most(field: &str, max: f64) -> Self {
        Self::new(field, None, Some(max))
    }

    fn new(field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            name: format!("{field} range check"),
            field: field.to_string(),
            min,
            max,
        }
    }

    fn expectation(&self) -> String {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => format!(
                "to be in range [{}, {}]",
                display_number(lo),
                display_number(hi)
            ),
            (Some(lo), None) => format!("to be at least {}", display_number(lo)),
            (None, Some(hi)) => format!("to be at most {}", display_number(hi)),
            (None, None) => "to be a number".to_string(),
        }
    }
}

impl Check for RangeCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, entity: &Entity, _ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        let value = match entity.field(&self.field) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(v) => v,
        };
        let in_range = value.as_f64().is_some_and(|n| {
            self.min.is_none_or(|lo| n >= lo) && self.max.is_none_or(|hi| n <= hi)
        });
        if in_range {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            &self.name,
            format!(
                "Expected {} {}, received {}",
                self.field,
                self.expectation(),
                repr_value(value)
            ),
        )])
    }
}
