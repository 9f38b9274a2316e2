use std::path::PathBuf;

use clap::ValueEnum;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Compact JSON on one line.
    Raw,
    /// One line per item; audit reports print their encoded lines.
    Lines,
}

impl OutputFormat {
    /// Parse a configured format name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns the rejected name when it is not a known format.
    pub fn parse_name(name: &str) -> Result<Self, String> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| format!("unknown output format '{name}' (expected json, raw or lines)"))
    }
}

/// Global flags available before or after subcommands, resolved against
/// configuration.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub data_dir: PathBuf,
}
