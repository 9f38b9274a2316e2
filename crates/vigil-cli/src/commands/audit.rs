use vigil_audit::JobSpec;
use vigil_core::report::AuditReport;
use vigil_store::TimeWindow;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::context::AppContext;
use crate::output;

/// Handle `vigil audit`.
///
/// Shard count and sorting were folded into the configuration during
/// bootstrap, so the job spec only carries kinds and the time window.
pub fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = run(args, ctx, flags)?;
    output::emit(&output::render_report(&report, flags.format)?);
    Ok(())
}

fn run(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<AuditReport> {
    if let (Some(since), Some(until)) = (args.since, args.until) {
        anyhow::ensure!(since < until, "--since must be earlier than --until");
    }

    let store = ctx.load_store(&flags.data_dir)?;
    let spec = JobSpec::for_kinds(args.kinds.iter().map(String::as_str)).with_window(TimeWindow {
        since: args.since,
        until: args.until,
    });

    let mut jobs = ctx.jobs(store);
    let id = jobs.create_new(spec)?;
    jobs.enqueue(&id)?;
    jobs.process_pending()?;

    let report = jobs.get_report(&id)?.clone();
    if let (Some(started), Some(finished)) = jobs.timings(&id)? {
        tracing::info!(
            job = %id,
            lines = report.lines.len(),
            elapsed_ms = (finished - started).num_milliseconds(),
            "audit finished"
        );
    }
    Ok(report)
}
