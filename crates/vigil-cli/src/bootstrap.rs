use anyhow::Context;
use vigil_config::VigilConfig;

use crate::cli::Cli;

/// Load layered configuration, honouring a `.env` file in the current
/// directory, and apply command-line overrides that change engine settings.
pub fn load_config(cli: &Cli) -> anyhow::Result<VigilConfig> {
    let mut config = VigilConfig::load_with_dotenv().context("failed to load vigil configuration")?;

    if let Some(dir) = &cli.data_dir {
        config.store.data_dir.clone_from(dir);
    }
    if let crate::cli::Commands::Audit(args) = &cli.command {
        if let Some(shards) = args.shards {
            config.audit.shard_count = usize::from(shards);
        }
        if args.unsorted {
            config.audit.sort_output = false;
        }
    }

    tracing::debug!(
        data_dir = %config.store.data_dir.display(),
        shard_count = config.audit.shard_count,
        "configuration loaded"
    );
    Ok(config)
}
