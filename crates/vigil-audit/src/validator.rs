//! Applies a kind's rule set to one entity.

use vigil_core::entities::{Entity, Kind};

use crate::check::{CheckContext, Finding};
use crate::error::AuditError;
use crate::registry::KindSpec;

/// Outcome of validating one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub kind: Kind,
    pub entity_id: String,
    /// Findings in rule order, each message prefixed with the entity id.
    pub findings: Vec<Finding>,
}

impl Verdict {
    /// `true` when the entity passed every check.
    #[must_use]
    pub fn is_fully_validated(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Runs every check of a rule set against an entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Run all checks of `spec` against `entity`, including the ones after a
    /// failing check.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::KindMismatch` if `entity` is not of the spec's
    /// kind, or the first error a check raises.
    pub fn validate(
        spec: &KindSpec,
        entity: &Entity,
        ctx: &CheckContext<'_>,
    ) -> Result<Verdict, AuditError> {
        if &entity.kind != spec.kind() {
            return Err(AuditError::KindMismatch {
                id: entity.id.clone(),
                expected: spec.kind().to_string(),
                actual: entity.kind.to_string(),
            });
        }

        let mut findings = Vec::new();
        for check in spec.rules() {
            for finding in check.run(entity, ctx)? {
                findings.push(Finding {
                    check: finding.check,
                    message: format!("Entity id {}: {}", entity.id, finding.message),
                });
            }
        }

        Ok(Verdict {
            kind: entity.kind.clone(),
            entity_id: entity.id.clone(),
            findings,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rules::ExternalKey;
    use crate::test_support::helpers::{TestStore, entity};

    fn spec() -> KindSpec {
        KindSpec::builder("ExpSummaryModel", r"^[a-z0-9]{1,4}$")
            .check(ExternalKey::field("exp_id", "ExplorationModel"))
            .build()
            .unwrap()
    }

    #[test]
    fn valid_entity_has_no_findings() {
        let store = TestStore::new();
        store.put(entity("ExplorationModel", "0"));
        let resolver = store.resolver();
        let verdict = Validator::validate(
            &spec(),
            &entity("ExpSummaryModel", "s0").with_field("exp_id", "0"),
            &store.ctx(&resolver),
        )
        .unwrap();
        assert!(verdict.is_fully_validated());
        assert_eq!(verdict.entity_id, "s0");
    }

    #[test]
    fn every_failing_check_is_reported() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let mut bad = entity("ExpSummaryModel", "BAD ID").with_field("exp_id", "9");
        bad.created_on = bad.last_updated + Duration::days(1);

        let verdict = Validator::validate(&spec(), &bad, &store.ctx(&resolver)).unwrap();
        let checks: Vec<&str> = verdict.findings.iter().map(|f| f.check.as_str()).collect();
        assert_eq!(
            checks,
            vec!["time field relation check", "model id check", "exp_id field check"]
        );
        assert!(
            verdict
                .findings
                .iter()
                .all(|f| f.message.starts_with("Entity id BAD ID: "))
        );
        assert_eq!(
            verdict.findings[1].message,
            "Entity id BAD ID: Entity id does not match regex pattern"
        );
    }

    #[test]
    fn wrong_kind_is_a_programming_error() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let err = Validator::validate(
            &spec(),
            &entity("ExplorationModel", "0"),
            &store.ctx(&resolver),
        )
        .unwrap_err();
        assert!(matches!(err, AuditError::KindMismatch { .. }));
    }
}
