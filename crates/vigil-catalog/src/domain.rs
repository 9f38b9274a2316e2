//! Domain object validation for the kinds that carry one.
//!
//! These rebuild just enough of the product's domain object from the raw
//! fields to run its structural validation. Each returns the first problem
//! found.

use serde_json::Value;
use vigil_audit::rules::DomainError;
use vigil_core::entities::Entity;
use vigil_core::pyrepr::{repr_str_list, repr_value};

pub const LANGUAGE_CODES: &[&str] = &["ar", "bn", "en", "es", "fr", "hi", "pt", "zh"];

pub const CLASSIFIER_JOB_STATUSES: &[&str] = &["NEW", "PENDING", "COMPLETE", "FAILED"];

pub const USER_ROLES: &[&str] = &[
    "ADMIN",
    "BANNED_USER",
    "EXPLORATION_EDITOR",
    "LEARNER",
    "MODERATOR",
    "TOPIC_MANAGER",
];

fn string<'a>(entity: &'a Entity, name: &str) -> Result<&'a str, DomainError> {
    match entity.field(name) {
        Some(Value::String(s)) => Ok(s),
        other => Err(DomainError::new(format!(
            "Expected {name} to be a string, received {}",
            repr_value(other.unwrap_or(&Value::Null))
        ))),
    }
}

fn one_of(name: &str, value: &str, allowed: &[&str]) -> Result<(), DomainError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(DomainError::new(format!("Invalid {name}: {value}")))
    }
}

/// An exploration needs a title, a category, a known language and an
/// initial state that exists.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn exploration(entity: &Entity) -> Result<(), DomainError> {
    string(entity, "title")?;
    if string(entity, "category")?.is_empty() {
        return Err(DomainError::new("Category must not be empty"));
    }
    one_of("language_code", string(entity, "language_code")?, LANGUAGE_CODES)?;

    let Some(Value::Object(states)) = entity.field("states") else {
        return Err(DomainError::new(format!(
            "Expected states to be a dict, received {}",
            repr_value(entity.field("states").unwrap_or(&Value::Null))
        )));
    };
    let init_state = string(entity, "init_state_name")?;
    if !states.contains_key(init_state) {
        let mut names: Vec<&str> = states.keys().map(String::as_str).collect();
        names.sort_unstable();
        return Err(DomainError::new(format!(
            "There is no state in {} corresponding to the exploration's initial state name {init_state}.",
            repr_str_list(names.as_slice())
        )));
    }
    Ok(())
}

/// A training job needs an algorithm, a known status and a list of
/// training data.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn classifier_training_job(entity: &Entity) -> Result<(), DomainError> {
    if string(entity, "algorithm_id")?.is_empty() {
        return Err(DomainError::new("Expected algorithm_id to be non-empty"));
    }
    one_of("status", string(entity, "status")?, CLASSIFIER_JOB_STATUSES)?;
    string(entity, "state_name")?;
    match entity.field("training_data") {
        Some(Value::Array(_)) => Ok(()),
        other => Err(DomainError::new(format!(
            "Expected training_data to be a list, received {}",
            repr_value(other.unwrap_or(&Value::Null))
        ))),
    }
}

/// A user needs a plausible email and a known role; a username, once set,
/// is alphanumeric.
///
/// # Errors
///
/// Returns the first validation failure.
pub fn user_settings(entity: &Entity) -> Result<(), DomainError> {
    let email = string(entity, "email")?;
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(DomainError::new(format!("Invalid email address: {email}")));
    }

    let role = string(entity, "role")?;
    if !USER_ROLES.contains(&role) {
        return Err(DomainError::new(format!("Role {role} does not exist.")));
    }

    match entity.field("username") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(name)) if name.is_empty() => {
            Err(DomainError::new("Empty username supplied."))
        }
        Some(Value::String(name)) if !name.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Err(DomainError::new(
                "Usernames can only have alphanumeric characters.",
            ))
        }
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(DomainError::new(format!(
            "Expected username to be a string, received {}",
            repr_value(other)
        ))),
    }
}
