//! Typed exploration change commands.
//!
//! Each command name maps to one payload struct; the struct's fields are
//! the attributes a `commit_cmds` dict must carry besides `cmd`. `Option`
//! fields are optional attributes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vigil_schema::{CommandSchemaRegistry, SchemaError};

pub const CREATE_NEW: &str = "create_new";
pub const ADD_STATE: &str = "add_state";
pub const RENAME_STATE: &str = "rename_state";
pub const DELETE_STATE: &str = "delete_state";
pub const EDIT_STATE_PROPERTY: &str = "edit_state_property";
pub const EDIT_EXPLORATION_PROPERTY: &str = "edit_exploration_property";
pub const MIGRATE_STATES_SCHEMA: &str = "migrate_states_schema_to_latest_version";
pub const AUTO_REVERT_VERSION: &str = "AUTO_revert_version_number";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CreateNew {
    pub category: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AddState {
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RenameState {
    pub old_state_name: String,
    pub new_state_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeleteState {
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EditStateProperty {
    pub state_name: String,
    pub property_name: String,
    pub new_value: Value,
    pub old_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EditExplorationProperty {
    pub property_name: String,
    pub new_value: Value,
    pub old_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MigrateStatesSchema {
    pub from_version: i64,
    pub to_version: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AutoRevertVersion {
    pub version_number: i64,
}

/// Schemas of every exploration change command.
///
/// # Errors
///
/// Returns `SchemaError` if a payload schema cannot be generated.
pub fn command_schemas() -> Result<CommandSchemaRegistry, SchemaError> {
    let mut registry = CommandSchemaRegistry::new();
    registry.register::<CreateNew>(CREATE_NEW)?;
    registry.register::<AddState>(ADD_STATE)?;
    registry.register::<RenameState>(RENAME_STATE)?;
    registry.register::<DeleteState>(DELETE_STATE)?;
    registry.register::<EditStateProperty>(EDIT_STATE_PROPERTY)?;
    registry.register::<EditExplorationProperty>(EDIT_EXPLORATION_PROPERTY)?;
    registry.register::<MigrateStatesSchema>(MIGRATE_STATES_SCHEMA)?;
    registry.register::<AutoRevertVersion>(AUTO_REVERT_VERSION)?;
    Ok(registry)
}
