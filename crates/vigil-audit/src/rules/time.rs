use vigil_core::entities::Entity;
use vigil_core::time::py_datetime;

use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// Fails when `created_on` is later than `last_updated`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFieldRelation;

impl TimeFieldRelation {
    pub const NAME: &'static str = "time field relation check";
}

impl Check for TimeFieldRelation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, entity: &Entity, _ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        if entity.created_on <= entity.last_updated {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            Self::NAME,
            format!(
                "The created_on field has a value {} which is greater than the value {} of last_updated field",
                py_datetime(&entity.created_on),
                py_datetime(&entity.last_updated)
            ),
        )])
    }
}

/// Fails when `last_updated` is later than the start of the audit run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentTime;

impl CurrentTime {
    pub const NAME: &'static str = "current time check";
}

impl Check for CurrentTime {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        if entity.last_updated <= ctx.run_started_at {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            Self::NAME,
            format!(
                "The last_updated field has a value {} which is greater than the time when the job was run",
                py_datetime(&entity.last_updated)
            ),
        )])
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{TestStore, entity_at};

    #[test]
    fn created_after_updated_fails() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let updated = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let e = entity_at("ExplorationModel", "0", updated + Duration::days(1), updated);

        let findings = TimeFieldRelation.run(&e, &store.ctx(&resolver)).unwrap();
        assert_eq!(
            findings,
            vec![Finding::new(
                "time field relation check",
                "The created_on field has a value 2026-05-02 00:00:00 which is greater than \
                 the value 2026-05-01 00:00:00 of last_updated field"
            )]
        );
    }

    #[test]
    fn equal_timestamps_pass() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let ts = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let e = entity_at("ExplorationModel", "0", ts, ts);
        assert!(TimeFieldRelation.run(&e, &store.ctx(&resolver)).unwrap().is_empty());
    }

    #[test]
    fn future_last_updated_fails() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let ctx = store.ctx(&resolver);
        let future = ctx.run_started_at + Duration::microseconds(1_500_000);
        let e = entity_at("ExplorationModel", "0", ctx.run_started_at, future);

        let findings = CurrentTime.run(&e, &ctx).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("The last_updated field has a value "));
        assert!(
            findings[0]
                .message
                .ends_with("which is greater than the time when the job was run")
        );
    }

    #[test]
    fn past_last_updated_passes() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let ctx = store.ctx(&resolver);
        let e = entity_at(
            "ExplorationModel",
            "0",
            ctx.run_started_at - Duration::days(2),
            ctx.run_started_at - Duration::days(1),
        );
        assert!(CurrentTime.run(&e, &ctx).unwrap().is_empty());
    }
}
