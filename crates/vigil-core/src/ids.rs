//! ID prefix constants and generation helpers.
//!
//! Generated ids have the form `{prefix}-{8 lowercase hex chars}`, e.g.
//! `aud-a3f8b2c1`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const PREFIX_AUDIT_JOB: &str = "aud";

/// Generate a prefixed id from 4 random bytes.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("random source unavailable: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}

/// Identifier of one audit job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh `aud-xxxxxxxx` id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if the OS random source is unavailable.
    pub fn generate() -> Result<Self, CoreError> {
        generate_id(PREFIX_AUDIT_JOB).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
