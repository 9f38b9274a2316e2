//! Explorations and the models that version, summarize and guard them.

use std::sync::Arc;

use serde_json::Value;
use vigil_audit::rules::{
    CommitCommands, Custom, DomainObject, ExternalKey, FieldConsistency, RefSource, SetComparison,
    SetMode, VersionOrder, split_versioned_id,
};
use vigil_audit::{AuditError, KindSpec};
use vigil_core::entities::Entity;
use vigil_core::pyrepr::{repr_str_list, repr_value};
use vigil_schema::CommandSchemaRegistry;

use crate::kinds::{
    COMMIT_LOG_ID, EXP_SUMMARY, EXPLORATION, EXPLORATION_COMMIT_LOG_ENTRY, EXPLORATION_ID,
    EXPLORATION_RIGHTS, EXPLORATION_SNAPSHOT_CONTENT, EXPLORATION_SNAPSHOT_METADATA,
    USER_SETTINGS, VERSIONED_ID,
};
use crate::{domain, own_id, versioned_parent};

pub const COMMIT_TYPES: &[&str] = &["create", "revert", "edit", "delete"];
pub const ACTIVITY_STATUSES: &[&str] = &["private", "public"];

/// Every kind in this module.
///
/// # Errors
///
/// Returns `AuditError` if a rule set cannot be built.
pub fn specs(commands: &Arc<CommandSchemaRegistry>) -> Result<Vec<KindSpec>, AuditError> {
    Ok(vec![
        exploration()?,
        snapshot_metadata(commands)?,
        snapshot_content()?,
        commit_log_entry(commands)?,
        rights()?,
        summary()?,
    ])
}

fn versions(entity: &Entity) -> std::ops::RangeInclusive<i64> {
    1..=entity.i64_field("version").unwrap_or(0)
}

fn snapshot_ids(entity: &Entity) -> Vec<String> {
    versions(entity)
        .map(|v| format!("{}-{v}", entity.id))
        .collect()
}

/// `exploration-{id}-{version}` into `(id, version)`.
#[must_use]
pub fn split_commit_log_id(id: &str) -> Option<(String, i64)> {
    split_versioned_id(id.strip_prefix("exploration-")?)
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn exploration() -> Result<KindSpec, AuditError> {
    KindSpec::builder(EXPLORATION, EXPLORATION_ID)
        .check(ExternalKey::derived(
            "exploration_commit_log_entry_ids",
            EXPLORATION_COMMIT_LOG_ENTRY,
            |e| {
                versions(e)
                    .map(|v| format!("exploration-{}-{v}", e.id))
                    .collect()
            },
        ))
        .check(ExternalKey::derived("exp_summary_ids", EXP_SUMMARY, own_id))
        .check(ExternalKey::derived(
            "exploration_rights_ids",
            EXPLORATION_RIGHTS,
            own_id,
        ))
        .check(ExternalKey::derived(
            "snapshot_metadata_ids",
            EXPLORATION_SNAPSHOT_METADATA,
            snapshot_ids,
        ))
        .check(ExternalKey::derived(
            "snapshot_content_ids",
            EXPLORATION_SNAPSHOT_CONTENT,
            snapshot_ids,
        ))
        .check(DomainObject::new(domain::exploration))
        .build()
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn snapshot_metadata(commands: &Arc<CommandSchemaRegistry>) -> Result<KindSpec, AuditError> {
    KindSpec::builder(EXPLORATION_SNAPSHOT_METADATA, VERSIONED_ID)
        .check(ExternalKey::derived(
            "exploration_ids",
            EXPLORATION,
            versioned_parent,
        ))
        .check(ExternalKey::derived("committer_ids", USER_SETTINGS, |e| {
            e.id_values("committer_id")
        }))
        .check(VersionOrder::new(
            EXPLORATION,
            "Exploration",
            "snapshot metadata",
        ))
        .check(CommitCommands::new("commit_cmds", Arc::clone(commands)))
        .check(Custom::new("commit type check", |e, _ctx| {
            Ok(match e.str_field("commit_type") {
                Some(t) if COMMIT_TYPES.contains(&t) => Vec::new(),
                _ => vec![format!(
                    "Commit type {} is not allowed",
                    field_text(e, "commit_type")
                )],
            })
        }))
        .build()
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn snapshot_content() -> Result<KindSpec, AuditError> {
    KindSpec::builder(EXPLORATION_SNAPSHOT_CONTENT, VERSIONED_ID)
        .check(ExternalKey::derived(
            "exploration_ids",
            EXPLORATION,
            versioned_parent,
        ))
        .check(VersionOrder::new(
            EXPLORATION,
            "Exploration",
            "snapshot content",
        ))
        .build()
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn commit_log_entry(commands: &Arc<CommandSchemaRegistry>) -> Result<KindSpec, AuditError> {
    KindSpec::builder(EXPLORATION_COMMIT_LOG_ENTRY, COMMIT_LOG_ID)
        .check(ExternalKey::derived("exploration_ids", EXPLORATION, |e| {
            e.id_values("exploration_id")
        }))
        .check(ExternalKey::derived("user_settings_ids", USER_SETTINGS, |e| {
            e.id_values("user_id")
        }))
        .check(
            VersionOrder::new(EXPLORATION, "Exploration", "commit log entry")
                .with_id_parser(split_commit_log_id),
        )
        .check(CommitCommands::new("commit_cmds", Arc::clone(commands)))
        .check(Custom::new("post commit status check", |e, _ctx| {
            Ok(match e.str_field("post_commit_status") {
                Some(s) if ACTIVITY_STATUSES.contains(&s) => Vec::new(),
                _ => vec![format!(
                    "Post commit status {} is invalid",
                    field_text(e, "post_commit_status")
                )],
            })
        }))
        .build()
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn rights() -> Result<KindSpec, AuditError> {
    KindSpec::builder(EXPLORATION_RIGHTS, EXPLORATION_ID)
        .check(ExternalKey::derived("exploration_ids", EXPLORATION, own_id))
        .check(ExternalKey::derived(
            "cloned_from_exploration_ids",
            EXPLORATION,
            |e| e.id_values("cloned_from"),
        ))
        .check(ExternalKey::derived("owner_user_ids", USER_SETTINGS, |e| {
            e.id_values("owner_ids")
        }))
        .check(ExternalKey::derived("editor_user_ids", USER_SETTINGS, |e| {
            e.id_values("editor_ids")
        }))
        .check(ExternalKey::derived("viewer_user_ids", USER_SETTINGS, |e| {
            e.id_values("viewer_ids")
        }))
        .check(SetComparison::within(
            "owner_ids",
            "viewer_ids",
            SetMode::Disjoint,
        ))
        .check(Custom::new("status check", |e, _ctx| {
            let status = e.str_field("status");
            if !status.is_some_and(|s| ACTIVITY_STATUSES.contains(&s)) {
                return Ok(vec![format!(
                    "Status {} is not a valid exploration status",
                    field_text(e, "status")
                )]);
            }
            let viewers = e.id_values("viewer_ids");
            if status == Some("public") && !viewers.is_empty() {
                return Ok(vec![format!(
                    "Expected viewer_ids to be empty for a public exploration, received {}",
                    repr_str_list(viewers.as_slice())
                )]);
            }
            Ok(Vec::new())
        }))
        .build()
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn summary() -> Result<KindSpec, AuditError> {
    let mut builder = KindSpec::builder(EXP_SUMMARY, EXPLORATION_ID)
        .check(ExternalKey::derived("exploration_ids", EXPLORATION, own_id))
        .check(ExternalKey::derived("owner_user_ids", USER_SETTINGS, |e| {
            e.id_values("owner_ids")
        }))
        .check(ExternalKey::derived(
            "contributor_user_ids",
            USER_SETTINGS,
            |e| e.id_values("contributor_ids"),
        ));
    for field in ["title", "category", "objective", "language_code", "version"] {
        builder = builder.check(FieldConsistency::new(
            field,
            EXPLORATION,
            "exploration",
            field,
            RefSource::EntityId,
        ));
    }
    builder
        .check(SetComparison::subset(
            "owner_ids",
            EXPLORATION_RIGHTS,
            "owner_ids",
            RefSource::EntityId,
        ))
        .check(Custom::new("ratings check", |e, _ctx| {
            Ok(if ratings_are_valid(e.field("ratings")) {
                Vec::new()
            } else {
                vec![format!(
                    "Expected ratings to have keys 1 to 5 with non-negative counts, received {}",
                    field_text(e, "ratings")
                )]
            })
        }))
        .build()
}

fn ratings_are_valid(ratings: Option<&Value>) -> bool {
    match ratings {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.iter().all(|(key, count)| {
            matches!(key.as_str(), "1" | "2" | "3" | "4" | "5") && count.as_u64().is_some()
        }),
        Some(_) => false,
    }
}

/// A field value as it appears in messages: strings bare, the rest as
/// literals, absent as `None`.
fn field_text(entity: &Entity, name: &str) -> String {
    match entity.field(name) {
        Some(Value::String(s)) => s.clone(),
        other => repr_value(other.unwrap_or(&Value::Null)),
    }
}
