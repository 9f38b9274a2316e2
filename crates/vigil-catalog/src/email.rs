//! Bulk emails and the per-user record of emails received.

use chrono::{DateTime, Utc};
use serde_json::Value;
use vigil_audit::rules::{Custom, ExternalKey, RefSource, SetComparison};
use vigil_audit::{AuditError, CheckContext, KindSpec};
use vigil_core::entities::Entity;
use vigil_core::pyrepr::repr_value;
use vigil_core::time::py_datetime;

use crate::kinds::{BULK_EMAIL, GENERATED_ID, USER_BULK_EMAILS, USER_ID, USER_SETTINGS};
use crate::own_id;

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn bulk_email() -> Result<KindSpec, AuditError> {
    KindSpec::builder(BULK_EMAIL, GENERATED_ID)
        .check(ExternalKey::field("sender_id", USER_SETTINGS))
        .check(ExternalKey::derived("recipient_id", USER_SETTINGS, |e| {
            e.id_values("recipient_ids")
        }))
        .check(Custom::new("sent datetime check", sent_datetime))
        .build()
}

/// # Errors
///
/// Returns `AuditError` if the rule set cannot be built.
pub fn user_bulk_emails() -> Result<KindSpec, AuditError> {
    KindSpec::builder(USER_BULK_EMAILS, USER_ID)
        .check(ExternalKey::derived("user_settings_ids", USER_SETTINGS, own_id))
        .check(ExternalKey::field("sent_email_model_ids", BULK_EMAIL))
        .check(
            SetComparison::subset(
                "id",
                BULK_EMAIL,
                "recipient_ids",
                RefSource::field("sent_email_model_ids"),
            )
            .with_left(RefSource::EntityId)
            .named("recipient check"),
        )
        .build()
}

fn sent_datetime(entity: &Entity, ctx: &CheckContext<'_>) -> Result<Vec<String>, AuditError> {
    let raw = entity.field("sent_datetime").unwrap_or(&Value::Null);
    let Some(sent) = raw
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&Utc))
    else {
        return Ok(vec![format!(
            "Expected sent_datetime to be a datetime, received {}",
            repr_value(raw)
        )]);
    };
    if sent <= ctx.run_started_at {
        return Ok(Vec::new());
    }
    Ok(vec![format!(
        "The sent_datetime field has a value {} which is greater than the time when the job was run",
        py_datetime(&sent)
    )])
}
