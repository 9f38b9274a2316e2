use serde::Serialize;
use serde_json::Value;
use vigil_core::report::AuditReport;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
///
/// In `lines` mode an array prints one compact JSON value per line and any
/// other value prints as compact JSON.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Lines => match serde_json::to_value(value)? {
            Value::Array(items) => {
                let lines = items
                    .iter()
                    .map(serde_json::to_string)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(lines.join("\n"))
            }
            other => Ok(serde_json::to_string(&other)?),
        },
    }
}

/// Render an audit report. `lines` prints the encoded report lines.
pub fn render_report(report: &AuditReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Lines => Ok(report.encoded().join("\n")),
        OutputFormat::Json | OutputFormat::Raw => render(report, format),
    }
}

/// Print a rendered response. Empty output prints nothing.
pub fn emit(rendered: &str) {
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vigil_core::report::{AuditReport, ReportLine};

    use super::*;

    fn report() -> AuditReport {
        AuditReport::new(vec![
            ReportLine::Failed {
                kind: "ExplorationModel".into(),
                check: "model id check".to_string(),
                messages: vec!["Entity id a b: Entity id does not match regex pattern".to_string()],
            },
            ReportLine::FullyValidated {
                kind: "ExplorationModel".into(),
                count: 2,
            },
        ])
    }

    #[test]
    fn lines_format_prints_encoded_report() {
        let rendered = render_report(&report(), OutputFormat::Lines).unwrap();
        assert_eq!(
            rendered,
            "[u'failed validation check for model id check of ExplorationModel', \
             [u'Entity id a b: Entity id does not match regex pattern']]\n\
             [u'fully-validated ExplorationModel', 2]"
        );
    }

    #[test]
    fn raw_format_is_tagged_json() {
        let rendered = render_report(&report(), OutputFormat::Raw).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value["lines"][1],
            json!({"status": "fully_validated", "kind": "ExplorationModel", "count": 2})
        );
    }

    #[test]
    fn lines_format_splits_arrays() {
        let rendered = render(&json!([{"a": 1}, "b"]), OutputFormat::Lines).unwrap();
        assert_eq!(rendered, "{\"a\":1}\n\"b\"");
    }

    #[test]
    fn json_format_is_pretty() {
        let rendered = render(&json!({"a": 1}), OutputFormat::Json).unwrap();
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }
}
