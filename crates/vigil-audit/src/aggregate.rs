//! Merges check outcomes into report lines.
//!
//! Failure messages are grouped by `(kind, check)`, deduplicated, and capped
//! at a fixed number per group; success is a count per kind. Lines keep the
//! order in which their key was first emitted. Merging is associative, so
//! shard outputs can be combined in any grouping as long as shard order is
//! preserved.

use std::collections::{HashMap, HashSet};

use vigil_core::entities::Kind;
use vigil_core::report::{AuditReport, ReportLine};

use crate::validator::Verdict;

/// Default number of messages retained per failing check.
pub const DEFAULT_MAX_ERRORS_PER_CHECK: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LineKey {
    Failed(Kind, String),
    Validated(Kind),
}

#[derive(Debug, Clone, Default)]
struct FailureGroup {
    messages: Vec<String>,
    seen: HashSet<String>,
}

/// Collects failures and success counts from any number of shards.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    cap: usize,
    order: Vec<LineKey>,
    failures: HashMap<(Kind, String), FailureGroup>,
    successes: HashMap<Kind, u64>,
    dropped: u64,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ERRORS_PER_CHECK)
    }
}

impl ResultAggregator {
    /// An empty aggregator retaining at most `cap` messages per check.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            order: Vec::new(),
            failures: HashMap::new(),
            successes: HashMap::new(),
            dropped: 0,
        }
    }

    /// Record one failure message. Duplicates of a retained message, and
    /// messages beyond the cap, are dropped.
    pub fn emit_failure(&mut self, kind: &Kind, check: &str, message: &str) {
        let key = (kind.clone(), check.to_string());
        if !self.failures.contains_key(&key) {
            self.order
                .push(LineKey::Failed(key.0.clone(), key.1.clone()));
        }
        let group = self.failures.entry(key).or_default();
        if group.seen.contains(message) {
            return;
        }
        if group.messages.len() >= self.cap {
            self.dropped += 1;
            return;
        }
        group.seen.insert(message.to_string());
        group.messages.push(message.to_string());
    }

    /// Add `count` fully validated entities of `kind`.
    pub fn add_validated(&mut self, kind: &Kind, count: u64) {
        if count == 0 {
            return;
        }
        match self.successes.get_mut(kind) {
            Some(total) => *total += count,
            None => {
                self.order.push(LineKey::Validated(kind.clone()));
                self.successes.insert(kind.clone(), count);
            }
        }
    }

    /// Record the outcome of one entity.
    pub fn record(&mut self, verdict: &Verdict) {
        if verdict.is_fully_validated() {
            self.add_validated(&verdict.kind, 1);
            return;
        }
        for finding in &verdict.findings {
            self.emit_failure(&verdict.kind, &finding.check, &finding.message);
        }
    }

    /// Fold `other` in after everything already recorded here.
    pub fn merge(&mut self, other: Self) {
        self.dropped += other.dropped;
        for key in other.order {
            match key {
                LineKey::Failed(kind, check) => {
                    let key = (kind, check);
                    let messages = other
                        .failures
                        .get(&key)
                        .map(|g| g.messages.as_slice())
                        .unwrap_or_default();
                    if messages.is_empty() {
                        continue;
                    }
                    for message in messages {
                        self.emit_failure(&key.0, &key.1, message);
                    }
                }
                LineKey::Validated(kind) => {
                    let count = other.successes.get(&kind).copied().unwrap_or(0);
                    self.add_validated(&kind, count);
                }
            }
        }
    }

    /// Messages dropped by the cap so far.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Build the report: lines in first-emission order, or sorted by their
    /// encoded form when `sort` is set.
    #[must_use]
    pub fn into_report(self, sort: bool) -> AuditReport {
        let Self {
            order,
            mut failures,
            successes,
            ..
        } = self;

        let lines = order
            .into_iter()
            .filter_map(|key| match key {
                LineKey::Failed(kind, check) => {
                    let group = failures.remove(&(kind.clone(), check.clone()))?;
                    Some(ReportLine::Failed {
                        kind,
                        check,
                        messages: group.messages,
                    })
                }
                LineKey::Validated(kind) => {
                    let count = successes.get(&kind).copied()?;
                    Some(ReportLine::FullyValidated { kind, count })
                }
            })
            .collect();

        let mut report = AuditReport::new(lines);
        if sort {
            report.sort_lines();
        }
        report
    }
}
