//! Registry of commit command schemas.
//!
//! Schemas are built from typed payload structs at registration time using
//! [`schemars::schema_for!`]. The struct's fields are the command's
//! attributes: non-`Option` fields are required, `Option` fields optional.
//! The `cmd` discriminator itself is not part of the payload struct.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Attribute name holding the command discriminator.
pub const CMD_KEY: &str = "cmd";

/// Required and optional attributes of one commit command.
///
/// The payload validator is compiled once when the schema is derived and
/// shared between clones.
#[derive(Clone)]
pub struct CommandSchema {
    pub name: String,
    pub required: Vec<String>,
    pub optional: Vec<String>,
    schema: Value,
    validator: Arc<jsonschema::Validator>,
}

impl fmt::Debug for CommandSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSchema")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CommandSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.required == other.required
            && self.optional == other.optional
            && self.schema == other.schema
    }
}

/// Outcome of checking one raw command dict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandCheck {
    /// The command conforms to its schema.
    Valid { cmd: String },
    /// No schema is registered for the command (or the dict has no `cmd`).
    Unknown,
    /// The command is registered but its attributes do not conform.
    Invalid { cmd: String, error: String },
}

impl CommandSchema {
    /// Derive a command schema from a typed payload struct.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if the generated schema cannot be
    /// converted to JSON, is not an object schema, or does not compile.
    pub fn from_type<T: JsonSchema>(name: &str) -> Result<Self, SchemaError> {
        let schema = serde_json::to_value(schema_for!(T))
            .map_err(|e| SchemaError::Generation(format!("{name}: {e}")))?;

        if schema.get("type").and_then(Value::as_str) != Some("object") {
            return Err(SchemaError::Generation(format!(
                "{name}: payload schema is not an object"
            )));
        }

        let mut required: Vec<String> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        required.sort();

        let mut optional: Vec<String> = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .keys()
                    .filter(|key| !required.contains(key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        optional.sort();

        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| SchemaError::Generation(format!("{name}: {e}")))?;

        Ok(Self {
            name: name.to_string(),
            required,
            optional,
            schema,
            validator: Arc::new(validator),
        })
    }

    /// The generated JSON Schema of the payload.
    #[must_use]
    pub const fn json_schema(&self) -> &Value {
        &self.schema
    }

    /// Check attribute presence and then attribute value types.
    ///
    /// Missing required attributes are reported first, then unexpected
    /// attributes, then value type errors; only the first category that
    /// fails is reported.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first failure.
    pub fn check_attributes(&self, command: &Map<String, Value>) -> Result<(), String> {
        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|name| !command.contains_key(name.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "The following required attributes are missing: {}",
                missing.join(", ")
            ));
        }

        let mut extra: Vec<&str> = command
            .keys()
            .map(String::as_str)
            .filter(|key| {
                *key != CMD_KEY
                    && !self.required.iter().any(|r| r == key)
                    && !self.optional.iter().any(|o| o == key)
            })
            .collect();
        extra.sort_unstable();
        if !extra.is_empty() {
            return Err(format!(
                "The following extra attributes are present: {}",
                extra.join(", ")
            ));
        }

        let mut payload = command.clone();
        payload.remove(CMD_KEY);
        match self.validate_payload(&Value::Object(payload)) {
            Ok(()) => Ok(()),
            Err(SchemaError::ValidationFailed { errors }) => Err(errors.join("; ")),
            Err(other) => Err(other.to_string()),
        }
    }

    /// Validate a payload (without `cmd`) against the compiled schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` listing every violation.
    pub fn validate_payload(&self, instance: &Value) -> Result<(), SchemaError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }
}

/// Central store of commit command schemas, keyed by command name.
#[derive(Debug, Clone, Default)]
pub struct CommandSchemaRegistry {
    schemas: BTreeMap<String, CommandSchema>,
}

impl CommandSchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the payload type of command `name`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Duplicate` if `name` is already registered, or
    /// `SchemaError::Generation` if the schema cannot be derived.
    pub fn register<T: JsonSchema>(&mut self, name: &str) -> Result<(), SchemaError> {
        if self.schemas.contains_key(name) {
            return Err(SchemaError::Duplicate(name.to_string()));
        }
        let schema = CommandSchema::from_type::<T>(name)?;
        self.schemas.insert(name.to_string(), schema);
        Ok(())
    }

    /// Get the schema registered for a command name.
    #[must_use]
    pub fn get_schema(&self, cmd: &str) -> Option<&CommandSchema> {
        self.schemas.get(cmd)
    }

    /// Check one raw command dict against its registered schema.
    #[must_use]
    pub fn check_command(&self, command: &Value) -> CommandCheck {
        let Some(map) = command.as_object() else {
            return CommandCheck::Unknown;
        };
        let Some(cmd) = map.get(CMD_KEY).and_then(Value::as_str) else {
            return CommandCheck::Unknown;
        };
        let Some(schema) = self.get_schema(cmd) else {
            return CommandCheck::Unknown;
        };
        match schema.check_attributes(map) {
            Ok(()) => CommandCheck::Valid {
                cmd: cmd.to_string(),
            },
            Err(error) => CommandCheck::Invalid {
                cmd: cmd.to_string(),
                error,
            },
        }
    }

    /// List all registered command names (sorted).
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schemars::JsonSchema;
    use serde_json::json;

    use super::*;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct RenameState {
        old_state_name: String,
        new_state_name: String,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct EditProperty {
        property_name: String,
        new_value: Value,
        old_value: Option<Value>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Migrate {
        from_version: u32,
        to_version: u32,
    }

    fn registry() -> CommandSchemaRegistry {
        let mut reg = CommandSchemaRegistry::new();
        reg.register::<RenameState>("rename_state").unwrap();
        reg.register::<EditProperty>("edit_property").unwrap();
        reg.register::<Migrate>("migrate").unwrap();
        reg
    }

    #[test]
    fn schema_splits_required_and_optional() {
        let reg = registry();
        let schema = reg.get_schema("edit_property").unwrap();
        assert_eq!(schema.required, vec!["new_value", "property_name"]);
        assert_eq!(schema.optional, vec!["old_value"]);
    }

    #[test]
    fn list_is_sorted() {
        let reg = registry();
        assert_eq!(reg.list(), vec!["edit_property", "migrate", "rename_state"]);
        assert_eq!(reg.schema_count(), 3);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut reg = registry();
        let err = reg.register::<Migrate>("migrate").unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate(name) if name == "migrate"));
    }

    #[rstest]
    #[case(json!({"cmd": "rename_state", "old_state_name": "A", "new_state_name": "B"}))]
    #[case(json!({"cmd": "edit_property", "property_name": "title", "new_value": "x"}))]
    #[case(json!({"cmd": "edit_property", "property_name": "title", "new_value": 3, "old_value": null}))]
    #[case(json!({"cmd": "migrate", "from_version": 1, "to_version": 2}))]
    fn conforming_commands_pass(#[case] command: Value) {
        assert!(matches!(
            registry().check_command(&command),
            CommandCheck::Valid { .. }
        ));
    }

    #[test]
    fn missing_required_attributes_listed() {
        let check = registry().check_command(&json!({"cmd": "edit_property"}));
        assert_eq!(
            check,
            CommandCheck::Invalid {
                cmd: "edit_property".into(),
                error: "The following required attributes are missing: new_value, property_name"
                    .into(),
            }
        );
    }

    #[test]
    fn extra_attributes_listed() {
        let check = registry().check_command(&json!({
            "cmd": "rename_state",
            "old_state_name": "A",
            "new_state_name": "B",
            "invalid_attribute": "x"
        }));
        assert_eq!(
            check,
            CommandCheck::Invalid {
                cmd: "rename_state".into(),
                error: "The following extra attributes are present: invalid_attribute".into(),
            }
        );
    }

    #[test]
    fn wrong_value_type_reported() {
        let check = registry().check_command(&json!({
            "cmd": "migrate",
            "from_version": "one",
            "to_version": 2
        }));
        assert!(matches!(check, CommandCheck::Invalid { ref cmd, .. } if cmd == "migrate"));
    }

    #[test]
    fn clones_share_the_compiled_validator() {
        let reg = registry();
        let schema = reg.get_schema("migrate").unwrap();
        let copy = schema.clone();
        assert!(Arc::ptr_eq(&schema.validator, &copy.validator));
        assert_eq!(&copy, schema);

        assert!(copy
            .validate_payload(&json!({"from_version": 1, "to_version": 2}))
            .is_ok());
        let err = copy
            .validate_payload(&json!({"from_version": "one", "to_version": 2}))
            .unwrap_err();
        assert!(matches!(err, SchemaError::ValidationFailed { errors } if errors.len() == 1));
    }

    #[rstest]
    #[case(json!({"cmd": "delete_everything"}))]
    #[case(json!({"state_name": "A"}))]
    #[case(json!("rename_state"))]
    fn unknown_commands(#[case] command: Value) {
        assert_eq!(registry().check_command(&command), CommandCheck::Unknown);
    }
}
