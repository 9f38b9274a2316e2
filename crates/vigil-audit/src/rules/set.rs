use vigil_core::entities::{Entity, Kind};
use vigil_core::pyrepr::repr_str_list;

use super::RefSource;
use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// How the two value sets must relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// No value may appear on both sides.
    Disjoint,
    /// Every value on the left must appear on the right.
    Subset,
}

#[derive(Debug, Clone)]
enum Counterpart {
    SameEntity,
    Linked { kind: Kind, link: RefSource },
}

/// Compares the values read from one entity with values read from another
/// entity (or from the same entity).
///
/// Each side is a [`RefSource`]: a field, the entity's own id, or a
/// derivation. Offending values are reported once each, in left order.
#[derive(Debug, Clone)]
pub struct SetComparison {
    name: String,
    field: String,
    left: RefSource,
    other_field: String,
    right: RefSource,
    mode: SetMode,
    counterpart: Counterpart,
}

impl SetComparison {
    /// `field` and `other_field` of the `other_kind` entity found through
    /// `link` must share no value.
    #[must_use]
    pub fn disjoint(
        field: &str,
        other_kind: impl Into<Kind>,
        other_field: &str,
        link: RefSource,
    ) -> Self {
        Self::linked(field, other_kind, other_field, link, SetMode::Disjoint)
    }

    /// Every value of `field` must appear in `other_field` of the
    /// `other_kind` entity found through `link`.
    #[must_use]
    pub fn subset(
        field: &str,
        other_kind: impl Into<Kind>,
        other_field: &str,
        link: RefSource,
    ) -> Self {
        Self::linked(field, other_kind, other_field, link, SetMode::Subset)
    }

    /// Compare two fields of the same entity.
    #[must_use]
    pub fn within(field: &str, other_field: &str, mode: SetMode) -> Self {
        Self::build(field, other_field, mode, Counterpart::SameEntity)
    }

    /// Read the left-hand values from `source` instead of the named field.
    #[must_use]
    pub fn with_left(mut self, source: RefSource) -> Self {
        self.left = source;
        self
    }

    /// Read the right-hand values from `source` instead of the named field.
    #[must_use]
    pub fn with_right(mut self, source: RefSource) -> Self {
        self.right = source;
        self
    }

    /// Override the default check name.
    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    fn linked(
        field: &str,
        other_kind: impl Into<Kind>,
        other_field: &str,
        link: RefSource,
        mode: SetMode,
    ) -> Self {
        Self::build(
            field,
            other_field,
            mode,
            Counterpart::Linked {
                kind: other_kind.into(),
                link,
            },
        )
    }

    fn build(field: &str, other_field: &str, mode: SetMode, counterpart: Counterpart) -> Self {
        let name = match mode {
            SetMode::Disjoint => format!("{field} overlap check"),
            SetMode::Subset => format!("{field} subset check"),
        };
        Self {
            name,
            field: field.to_string(),
            left: RefSource::field(field),
            other_field: other_field.to_string(),
            right: RefSource::field(other_field),
            mode,
            counterpart,
        }
    }

    fn offending(&self, left: &[String], right: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for value in left {
            let on_right = right.contains(value);
            let bad = match self.mode {
                SetMode::Disjoint => on_right,
                SetMode::Subset => !on_right,
            };
            if bad && !out.contains(value) {
                out.push(value.clone());
            }
        }
        out
    }

    /// `other` is the counterpart's kind and id when it is another entity.
    fn message(&self, other: Option<(&Kind, &str)>, values: &[String]) -> String {
        if matches!(self.left, RefSource::EntityId) {
            return self.own_id_message(other);
        }
        let values = repr_str_list(values);
        match (self.mode, other) {
            (SetMode::Disjoint, Some((kind, _))) => format!(
                "Common values for {} in entity and {} in {kind}: {values}",
                self.field, self.other_field
            ),
            (SetMode::Disjoint, None) => format!(
                "Common values for {} and {} in entity: {values}",
                self.field, self.other_field
            ),
            (SetMode::Subset, Some((kind, _))) => format!(
                "Values of {} in entity missing from {} in {kind}: {values}",
                self.field, self.other_field
            ),
            (SetMode::Subset, None) => format!(
                "Values of {} missing from {} in entity: {values}",
                self.field, self.other_field
            ),
        }
    }

    fn own_id_message(&self, other: Option<(&Kind, &str)>) -> String {
        let relation = match self.mode {
            SetMode::Disjoint => "contains",
            SetMode::Subset => "does not contain",
        };
        match other {
            Some((kind, id)) => format!(
                "{} field in {kind} with id {id} {relation} the entity id",
                self.other_field
            ),
            None => format!("{} field {relation} the entity id", self.other_field),
        }
    }
}

impl Check for SetComparison {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        let left = self.left.ids(entity);
        if left.is_empty() {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        match &self.counterpart {
            Counterpart::SameEntity => {
                let bad = self.offending(&left, &self.right.ids(entity));
                if !bad.is_empty() {
                    findings.push(Finding::new(&self.name, self.message(None, &bad)));
                }
            }
            Counterpart::Linked { kind, link } => {
                for other_id in link.ids(entity) {
                    let Some(other) = ctx.resolver.find(kind, &other_id)? else {
                        continue;
                    };
                    let bad = self.offending(&left, &self.right.ids(&other));
                    if !bad.is_empty() {
                        findings.push(Finding::new(
                            &self.name,
                            self.message(Some((kind, other_id.as_str())), &bad),
                        ));
                    }
                }
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_support::helpers::{TestStore, entity};

    #[test]
    fn completed_and_incomplete_must_not_overlap() {
        let store = TestStore::new();
        store.put(
            entity("IncompleteActivitiesModel", "u1")
                .with_field("exploration_ids", json!(["2", "0", "5"])),
        );
        let resolver = store.resolver();
        let check = SetComparison::disjoint(
            "exploration_ids",
            "IncompleteActivitiesModel",
            "exploration_ids",
            RefSource::EntityId,
        );
        assert_eq!(check.name(), "exploration_ids overlap check");

        let completed = entity("CompletedActivitiesModel", "u1")
            .with_field("exploration_ids", json!(["0", "1", "2"]));
        let findings = check.run(&completed, &store.ctx(&resolver)).unwrap();
        assert_eq!(
            findings,
            vec![Finding::new(
                "exploration_ids overlap check",
                "Common values for exploration_ids in entity and exploration_ids in \
                 IncompleteActivitiesModel: [u'0', u'2']"
            )]
        );
    }

    #[test]
    fn subset_reports_values_missing_from_other() {
        let store = TestStore::new();
        store.put(entity("UserSettingsModel", "bulk1").with_field("recipient_ids", json!(["u1"])));
        let resolver = store.resolver();
        let check = SetComparison::subset(
            "recipient_ids",
            "UserSettingsModel",
            "recipient_ids",
            RefSource::field("email_id"),
        );

        let e = entity("ExplorationModel", "x")
            .with_field("email_id", "bulk1")
            .with_field("recipient_ids", json!(["u1", "u2", "u2"]));
        let findings = check.run(&e, &store.ctx(&resolver)).unwrap();
        assert_eq!(
            findings[0].message,
            "Values of recipient_ids in entity missing from recipient_ids in UserSettingsModel: [u'u2']"
        );
    }

    #[test]
    fn within_same_entity() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let check = SetComparison::within("owner_ids", "viewer_ids", SetMode::Disjoint)
            .named("owner viewer check");

        let e = entity("ExplorationModel", "0")
            .with_field("owner_ids", json!(["u1", "u2"]))
            .with_field("viewer_ids", json!(["u2"]));
        let findings = check.run(&e, &store.ctx(&resolver)).unwrap();
        assert_eq!(
            findings,
            vec![Finding::new(
                "owner viewer check",
                "Common values for owner_ids and viewer_ids in entity: [u'u2']"
            )]
        );
    }

    #[test]
    fn missing_counterpart_or_empty_field_passes() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let check = SetComparison::disjoint(
            "exploration_ids",
            "IncompleteActivitiesModel",
            "exploration_ids",
            RefSource::EntityId,
        );
        let lonely = entity("CompletedActivitiesModel", "u9")
            .with_field("exploration_ids", json!(["0"]));
        let empty = entity("CompletedActivitiesModel", "u8");
        assert!(check.run(&lonely, &store.ctx(&resolver)).unwrap().is_empty());
        assert!(check.run(&empty, &store.ctx(&resolver)).unwrap().is_empty());
    }

    #[test]
    fn own_id_must_appear_in_each_linked_entity() {
        let store = TestStore::new();
        store.put(entity("UserSettingsModel", "e1").with_field("recipient_ids", json!(["u1"])));
        store.put(entity("UserSettingsModel", "e2").with_field("recipient_ids", json!(["u2"])));
        let resolver = store.resolver();
        let check = SetComparison::subset(
            "id",
            "UserSettingsModel",
            "recipient_ids",
            RefSource::field("email_ids"),
        )
        .with_left(RefSource::EntityId)
        .named("recipient check");

        let e = entity("CompletedActivitiesModel", "u1")
            .with_field("email_ids", json!(["e1", "e2", "e3"]));
        let findings = check.run(&e, &store.ctx(&resolver)).unwrap();
        assert_eq!(
            findings,
            vec![Finding::new(
                "recipient check",
                "recipient_ids field in UserSettingsModel with id e2 does not contain the entity id"
            )]
        );
    }

    #[test]
    fn right_side_can_be_derived() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let check = SetComparison::within("owner_ids", "own id", SetMode::Disjoint)
            .with_right(RefSource::EntityId);
        let e = entity("ExplorationModel", "u1").with_field("owner_ids", json!(["u1", "u2"]));
        let findings = check.run(&e, &store.ctx(&resolver)).unwrap();
        assert_eq!(
            findings[0].message,
            "Common values for owner_ids and own id in entity: [u'u1']"
        );
    }
}
