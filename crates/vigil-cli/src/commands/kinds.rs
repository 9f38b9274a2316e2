use serde::Serialize;
use vigil_audit::KindSpec;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output;

#[derive(Debug, Serialize)]
struct KindSummary<'a> {
    kind: &'a str,
    id_pattern: &'a str,
    checks: Vec<&'a str>,
}

impl<'a> From<&'a KindSpec> for KindSummary<'a> {
    fn from(spec: &'a KindSpec) -> Self {
        Self {
            kind: spec.kind().as_str(),
            id_pattern: spec.id_pattern(),
            checks: spec.rules().names(),
        }
    }
}

/// Handle `vigil kinds`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let summaries: Vec<KindSummary<'_>> = ctx.registry.iter().map(KindSummary::from).collect();
    output::emit(&output::render(&summaries, flags.format)?);
    Ok(())
}
