use std::sync::Arc;

use serde_json::Value;
use vigil_core::entities::Entity;
use vigil_core::pyrepr::repr_value;
use vigil_schema::{CommandCheck, CommandSchemaRegistry};

use crate::check::{Check, CheckContext, Finding};
use crate::error::AuditError;

/// Each dict in a commit command list must match the schema registered for
/// its `cmd`.
///
/// Commands with no registered schema are grouped under this check's name;
/// malformed commands of a known type are grouped under
/// `commit cmd {cmd} check`. Every bad command yields its own finding.
#[derive(Debug, Clone)]
pub struct CommitCommands {
    field: String,
    registry: Arc<CommandSchemaRegistry>,
}

impl CommitCommands {
    pub const NAME: &'static str = "commit cmd check";

    /// Check the commands held in `field` (usually `commit_cmds`).
    #[must_use]
    pub fn new(field: &str, registry: Arc<CommandSchemaRegistry>) -> Self {
        Self {
            field: field.to_string(),
            registry,
        }
    }

    fn unknown(command: &Value) -> Finding {
        Finding::new(
            Self::NAME,
            format!(
                "No commit command domain object defined for entity with commands: [{}]",
                repr_value(command)
            ),
        )
    }
}

impl Check for CommitCommands {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&self, entity: &Entity, _ctx: &CheckContext<'_>) -> Result<Vec<Finding>, AuditError> {
        let commands = match entity.field(&self.field) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(commands)) => commands,
            Some(other) => return Ok(vec![Self::unknown(other)]),
        };

        let mut findings = Vec::new();
        for command in commands {
            match self.registry.check_command(command) {
                CommandCheck::Valid { .. } => {}
                CommandCheck::Unknown => findings.push(Self::unknown(command)),
                CommandCheck::Invalid { cmd, error } => findings.push(Finding::new(
                    format!("commit cmd {cmd} check"),
                    format!(
                        "Commit command domain validation for command: {} failed with error: {error}",
                        repr_value(command)
                    ),
                )),
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use schemars::JsonSchema;
    use serde_json::json;

    use super::*;
    use crate::test_support::helpers::{TestStore, entity};

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct AddState {
        state_name: String,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct EditStateProperty {
        state_name: String,
        property_name: String,
        new_value: Value,
        old_value: Option<Value>,
    }

    fn check() -> CommitCommands {
        let mut registry = CommandSchemaRegistry::new();
        registry.register::<AddState>("add_state").unwrap();
        registry
            .register::<EditStateProperty>("edit_state_property")
            .unwrap();
        CommitCommands::new("commit_cmds", Arc::new(registry))
    }

    fn run(commands: Value) -> Vec<Finding> {
        let store = TestStore::new();
        let resolver = store.resolver();
        let e = entity("ExplorationSnapshotMetadataModel", "0-1").with_field("commit_cmds", commands);
        check().run(&e, &store.ctx(&resolver)).unwrap()
    }

    #[test]
    fn conforming_commands_pass() {
        let findings = run(json!([
            {"cmd": "add_state", "state_name": "Intro"},
            {"cmd": "edit_state_property", "state_name": "Intro", "property_name": "content", "new_value": "Hi"}
        ]));
        assert!(findings.is_empty());
    }

    #[test]
    fn missing_attributes_grouped_per_command() {
        let findings = run(json!([{"cmd": "edit_state_property", "state_name": "Intro"}]));
        assert_eq!(
            findings,
            vec![Finding::new(
                "commit cmd edit_state_property check",
                "Commit command domain validation for command: {u'cmd': u'edit_state_property', \
                 u'state_name': u'Intro'} failed with error: The following required attributes \
                 are missing: new_value, property_name"
            )]
        );
    }

    #[test]
    fn extra_attributes_reported() {
        let findings = run(json!([
            {"cmd": "add_state", "state_name": "Intro", "invalid_attribute": "x"}
        ]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check, "commit cmd add_state check");
        assert!(
            findings[0]
                .message
                .ends_with("The following extra attributes are present: invalid_attribute")
        );
    }

    #[test]
    fn unknown_command_names_the_command() {
        let findings = run(json!([{"cmd": "invalid", "state_name": "x"}]));
        assert_eq!(
            findings,
            vec![Finding::new(
                "commit cmd check",
                "No commit command domain object defined for entity with commands: \
                 [{u'cmd': u'invalid', u'state_name': u'x'}]"
            )]
        );
    }

    #[test]
    fn one_finding_per_bad_command() {
        let findings = run(json!([
            {"cmd": "add_state"},
            {"cmd": "add_state", "state_name": "ok"},
            {"cmd": "nope"},
            {"state_name": "no cmd at all"}
        ]));
        let checks: Vec<&str> = findings.iter().map(|f| f.check.as_str()).collect();
        assert_eq!(
            checks,
            vec!["commit cmd add_state check", "commit cmd check", "commit cmd check"]
        );
    }

    #[test]
    fn absent_commands_pass() {
        let store = TestStore::new();
        let resolver = store.resolver();
        let e = entity("ExplorationSnapshotMetadataModel", "0-1");
        assert!(check().run(&e, &store.ctx(&resolver)).unwrap().is_empty());
    }
}
