//! # vigil-catalog
//!
//! The audited platform's kinds and their rule sets.
//!
//! Every kind is registered explicitly with its id pattern and checks; the
//! only kind-specific code is parameter choice plus a handful of closures
//! and domain validators.
//!
//! - [`kinds`]: kind names and id patterns
//! - [`commands`]: typed exploration change commands
//! - [`domain`]: domain object validation hooks
//! - [`exploration`], [`classifier`], [`user`], [`email`]: rule sets

pub mod classifier;
pub mod commands;
pub mod domain;
pub mod email;
pub mod exploration;
pub mod kinds;
pub mod user;

mod error;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use vigil_audit::KindRegistry;
use vigil_audit::rules::split_versioned_id;
use vigil_core::entities::Entity;

pub use error::CatalogError;

/// Build the registry of every catalog kind.
///
/// # Errors
///
/// Returns `CatalogError` if a command schema or a rule set cannot be built.
pub fn build_registry() -> Result<KindRegistry, CatalogError> {
    let commands = Arc::new(commands::command_schemas()?);

    let mut specs = exploration::specs(&commands)?;
    specs.push(classifier::training_job()?);
    specs.extend(user::specs(&commands)?);
    specs.push(email::bulk_email()?);
    specs.push(email::user_bulk_emails()?);

    let mut registry = KindRegistry::new();
    for spec in specs {
        registry.register(spec)?;
    }
    tracing::debug!(
        kinds = registry.len(),
        commands = commands.schema_count(),
        "catalog registered"
    );
    Ok(registry)
}

/// Models keyed by the id of the entity they reference.
pub(crate) fn own_id(entity: &Entity) -> Vec<String> {
    vec![entity.id.clone()]
}

/// The parent id of a `{parent}-{version}` id.
pub(crate) fn versioned_parent(entity: &Entity) -> Vec<String> {
    split_versioned_id(&entity.id)
        .map(|(parent, _)| parent)
        .into_iter()
        .collect()
}
