use serde::Serialize;
use serde_json::Value;
use vigil_catalog::commands::command_schemas;
use vigil_schema::CommandSchema;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output;

#[derive(Debug, Serialize)]
struct SchemaView<'a> {
    cmd: &'a str,
    required: &'a [String],
    optional: &'a [String],
    schema: &'a Value,
}

impl<'a> From<&'a CommandSchema> for SchemaView<'a> {
    fn from(schema: &'a CommandSchema) -> Self {
        Self {
            cmd: &schema.name,
            required: &schema.required,
            optional: &schema.optional,
            schema: schema.json_schema(),
        }
    }
}

/// Handle `vigil schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = command_schemas()?;
    let rendered = match &args.cmd {
        Some(cmd) => {
            let schema = registry
                .get_schema(cmd)
                .ok_or_else(|| anyhow::anyhow!("unknown commit command '{cmd}'"))?;
            output::render(&SchemaView::from(schema), flags.format)?
        }
        None => {
            let views = registry
                .list()
                .into_iter()
                .filter_map(|cmd| registry.get_schema(cmd))
                .map(SchemaView::from)
                .collect::<Vec<_>>();
            output::render(&views, flags.format)?
        }
    };
    output::emit(&rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn view_lists_required_and_optional_attributes() {
        let registry = command_schemas().unwrap();
        let view = SchemaView::from(registry.get_schema("edit_state_property").unwrap());
        assert_eq!(view.cmd, "edit_state_property");
        assert!(view.required.iter().any(|name| name == "state_name"));
        assert_eq!(view.optional, ["old_value"]);
    }
}
