use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Audit the snapshot in the data directory.
    Audit(AuditArgs),
    /// List registered kinds with their id pattern and checks.
    Kinds,
    /// Print commit command schemas.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Kind to audit (repeatable). All registered kinds when omitted.
    #[arg(short, long = "kind")]
    pub kinds: Vec<String>,

    /// Keep report lines in emission order.
    #[arg(long)]
    pub unsorted: bool,

    /// Only entities last updated at or after this instant (RFC 3339).
    #[arg(long, value_parser = parse_timestamp)]
    pub since: Option<DateTime<Utc>>,

    /// Only entities last updated before this instant (RFC 3339).
    #[arg(long, value_parser = parse_timestamp)]
    pub until: Option<DateTime<Utc>>,

    /// Upper bound on shards per kind, overriding configuration.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub shards: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Command name, e.g. `add_state`. Every command when omitted.
    pub cmd: Option<String>,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}
