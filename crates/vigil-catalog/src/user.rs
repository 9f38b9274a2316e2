//! Users and the per-user activity models.

use std::sync::Arc;

use vigil_audit::rules::{
    CommitCommands, Custom, DomainObject, ExternalKey, RangeCheck, RefSource, SetComparison,
};
use vigil_audit::{AuditError, KindSpec};
use vigil_core::entities::Kind;
use vigil_schema::CommandSchemaRegistry;

use crate::kinds::{
    COMPLETED_ACTIVITIES, EXPLORATION, EXPLORATION_USER_DATA, INCOMPLETE_ACTIVITIES,
    USER_DATA_ID, USER_ID, USER_SETTINGS,
};
use crate::{domain, own_id};

/// Every kind in this module.
///
/// # Errors
///
/// Returns `AuditError` if a rule set cannot be built.
pub fn specs(commands: &Arc<CommandSchemaRegistry>) -> Result<Vec<KindSpec>, AuditError> {
    Ok(vec![
        settings()?,
        activities(COMPLETED_ACTIVITIES, INCOMPLETE_ACTIVITIES)?,
        activities(INCOMPLETE_ACTIVITIES, COMPLETED_ACTIVITIES)?,
        exploration_user_data(commands)?,
    ])
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn settings() -> Result<KindSpec, AuditError> {
    KindSpec::builder(USER_SETTINGS, USER_ID)
        .check(DomainObject::new(domain::user_settings))
        .build()
}

/// Completed and incomplete activity lists: an exploration is in at most
/// one of them.
fn activities(kind: &str, other: &str) -> Result<KindSpec, AuditError> {
    KindSpec::builder(kind, USER_ID)
        .check(ExternalKey::derived("user_settings_ids", USER_SETTINGS, own_id))
        .check(ExternalKey::field("exploration_ids", EXPLORATION))
        .check(SetComparison::disjoint(
            "exploration_ids",
            other,
            "exploration_ids",
            RefSource::EntityId,
        ))
        .build()
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn exploration_user_data(
    commands: &Arc<CommandSchemaRegistry>,
) -> Result<KindSpec, AuditError> {
    KindSpec::builder(EXPLORATION_USER_DATA, USER_DATA_ID)
        .check(ExternalKey::derived("user_settings_ids", USER_SETTINGS, |e| {
            e.id_values("user_id")
        }))
        .check(ExternalKey::derived("exploration_ids", EXPLORATION, |e| {
            e.id_values("exploration_id")
        }))
        .check(RangeCheck::between("rating", 1.0, 5.0))
        .check(CommitCommands::new("draft_change_list", Arc::clone(commands)))
        .check(Custom::new("draft change list exp version check", |e, ctx| {
            let (Some(exp_id), Some(draft_version)) = (
                e.str_field("exploration_id"),
                e.i64_field("draft_change_list_exp_version"),
            ) else {
                return Ok(Vec::new());
            };
            let Some(exploration) = ctx.resolver.find(&Kind::new(EXPLORATION), exp_id)? else {
                return Ok(Vec::new());
            };
            let current = exploration.i64_field("version").unwrap_or(0);
            Ok(if draft_version > current {
                vec![format!(
                    "draft change list exp version {draft_version} is greater than the version {current} of corresponding exploration with id {exp_id}"
                )]
            } else {
                Vec::new()
            })
        }))
        .build()
}
