//! Ordered, uniquely named checks for one kind.

use crate::check::Check;
use crate::error::AuditError;

/// The ordered checks registered for one kind.
///
/// Check names are the report's grouping keys, so they must be unique
/// within a rule set.
#[derive(Debug, Default)]
pub struct RuleSet {
    checks: Vec<Box<dyn Check>>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::DuplicateCheck` if a check with the same name is
    /// already present.
    pub fn push(&mut self, check: Box<dyn Check>) -> Result<(), AuditError> {
        if self.checks.iter().any(|c| c.name() == check.name()) {
            return Err(AuditError::DuplicateCheck(check.name().to_string()));
        }
        self.checks.push(check);
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Box<dyn Check>> {
        self.checks.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Box<dyn Check>;
    type IntoIter = std::slice::Iter<'a, Box<dyn Check>>;

    fn into_iter(self) -> Self::IntoIter {
        self.checks.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rules::{CurrentTime, ExternalKey, TimeFieldRelation};

    #[test]
    fn keeps_insertion_order() {
        let mut rules = RuleSet::new();
        rules.push(Box::new(TimeFieldRelation)).unwrap();
        rules.push(Box::new(CurrentTime)).unwrap();
        rules
            .push(Box::new(ExternalKey::field("exp_id", "ExplorationModel")))
            .unwrap();
        assert_eq!(
            rules.names(),
            vec!["time field relation check", "current time check", "exp_id field check"]
        );
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut rules = RuleSet::new();
        rules
            .push(Box::new(ExternalKey::field("exp_id", "ExplorationModel")))
            .unwrap();
        let err = rules
            .push(Box::new(ExternalKey::field("exp_id", "ExpSummaryModel")))
            .unwrap_err();
        assert!(matches!(err, AuditError::DuplicateCheck(name) if name == "exp_id field check"));
        assert_eq!(rules.len(), 1);
    }
}
