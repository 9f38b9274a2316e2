use std::path::PathBuf;

use clap::Parser;
use vigil_config::VigilConfig;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `vigil` binary.
#[derive(Debug, Parser)]
#[command(name = "vigil", version, about = "vigil - document store audit engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw, lines (defaults to general.default_format)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Snapshot directory of `<Kind>.jsonl` files (defaults to store.data_dir)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolve global flags, falling back to configuration.
    ///
    /// # Errors
    ///
    /// Fails when no `--format` is given and the configured default is not a
    /// known format.
    pub fn global_flags(&self, config: &VigilConfig) -> anyhow::Result<GlobalFlags> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::parse_name(&config.general.default_format)
                .map_err(anyhow::Error::msg)?,
        };
        Ok(GlobalFlags {
            format,
            data_dir: self
                .data_dir
                .clone()
                .unwrap_or_else(|| config.store.data_dir.clone()),
        })
    }
}
