//! Audit report lines and their string encoding.
//!
//! Each line is encoded as a stringified two-element Python list:
//!
//! ```text
//! [u'failed validation check for time field relation check of ExplorationModel', [u'Entity id 0: ...']]
//! [u'fully-validated ExplorationModel', 3]
//! ```

use serde::{Deserialize, Serialize};

use crate::entities::Kind;
use crate::pyrepr::{repr_str, repr_str_list};

/// One aggregated line of an audit report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportLine {
    /// Messages produced by one check across all entities of a kind.
    Failed {
        kind: Kind,
        check: String,
        messages: Vec<String>,
    },
    /// Number of entities of a kind that passed every check.
    FullyValidated { kind: Kind, count: u64 },
}

impl ReportLine {
    #[must_use]
    pub const fn kind(&self) -> &Kind {
        match self {
            Self::Failed { kind, .. } | Self::FullyValidated { kind, .. } => kind,
        }
    }

    /// Human-readable first element of the encoded pair.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Failed { kind, check, .. } => {
                format!("failed validation check for {check} of {kind}")
            }
            Self::FullyValidated { kind, .. } => format!("fully-validated {kind}"),
        }
    }

    /// Bit-exact string form of this line.
    #[must_use]
    pub fn encode(&self) -> String {
        let payload = match self {
            Self::Failed { messages, .. } => repr_str_list(messages),
            Self::FullyValidated { count, .. } => count.to_string(),
        };
        format!("[{}, {payload}]", repr_str(&self.description()))
    }
}

/// Final output of an audit job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub lines: Vec<ReportLine>,
}

impl AuditReport {
    #[must_use]
    pub const fn new(lines: Vec<ReportLine>) -> Self {
        Self { lines }
    }

    /// Encode every line in report order.
    #[must_use]
    pub fn encoded(&self) -> Vec<String> {
        self.lines.iter().map(ReportLine::encode).collect()
    }

    /// Reorder lines lexicographically by their encoded form.
    pub fn sort_lines(&mut self) {
        self.lines.sort_by_cached_key(ReportLine::encode);
    }

    /// `true` when no check failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.lines
            .iter()
            .all(|line| matches!(line, ReportLine::FullyValidated { .. }))
    }

    #[must_use]
    pub fn validated_count(&self, kind: &str) -> Option<u64> {
        self.lines.iter().find_map(|line| match line {
            ReportLine::FullyValidated { kind: k, count } if k.as_str() == kind => Some(*count),
            _ => None,
        })
    }

    #[must_use]
    pub fn failures(&self, kind: &str, check: &str) -> Option<&[String]> {
        self.lines.iter().find_map(|line| match line {
            ReportLine::Failed {
                kind: k,
                check: c,
                messages,
            } if k.as_str() == kind && c == check => Some(messages.as_slice()),
            _ => None,
        })
    }

    /// Total number of retained failure messages.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.lines
            .iter()
            .map(|line| match line {
                ReportLine::Failed { messages, .. } => messages.len(),
                ReportLine::FullyValidated { .. } => 0,
            })
            .sum()
    }
}
