//! Classifier training jobs, one per exploration state answer group.

use vigil_audit::rules::{Custom, DomainObject, ExternalKey};
use vigil_audit::{AuditError, CheckContext, KindSpec};
use vigil_core::entities::{Entity, Kind};

use crate::domain;
use crate::kinds::{CLASSIFIER_TRAINING_JOB, EXPLORATION, GENERATED_ID};

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn training_job() -> Result<KindSpec, AuditError> {
    KindSpec::builder(CLASSIFIER_TRAINING_JOB, GENERATED_ID)
        .check(ExternalKey::derived("exploration_ids", EXPLORATION, |e| {
            e.id_values("exp_id")
        }))
        .check(Custom::new("exp version check", exp_version))
        .check(Custom::new("state name check", state_name))
        .check(DomainObject::new(domain::classifier_training_job))
        .build()
}

fn exploration(entity: &Entity, ctx: &CheckContext<'_>) -> Result<Option<Entity>, AuditError> {
    let Some(exp_id) = entity.str_field("exp_id") else {
        return Ok(None);
    };
    Ok(ctx.resolver.find(&Kind::new(EXPLORATION), exp_id)?)
}

/// The job cannot train on a version the exploration has not reached.
fn exp_version(entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<String>, AuditError> {
    let Some(exploration) = exploration(entity, ctx)? else {
        return Ok(Vec::new());
    };
    let job_version = entity.i64_field("exp_version").unwrap_or(0);
    let current = exploration.i64_field("version").unwrap_or(0);
    if job_version <= current {
        return Ok(Vec::new());
    }
    Ok(vec![format!(
        "Exploration model corresponding to exp_id {} has a version {current} which is less than the version {job_version} stored in the entity",
        exploration.id
    )])
}

fn state_name(entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<String>, AuditError> {
    let Some(exploration) = exploration(entity, ctx)? else {
        return Ok(Vec::new());
    };
    let Some(state) = entity.str_field("state_name") else {
        return Ok(Vec::new());
    };
    let present = exploration
        .field("states")
        .and_then(serde_json::Value::as_object)
        .is_some_and(|states| states.contains_key(state));
    if present {
        return Ok(Vec::new());
    }
    Ok(vec![format!(
        "State name {state} in entity is not present in states of corresponding exploration model with id {}",
        exploration.id
    )])
}
