//! Scan restrictions: id ranges (shards) and `last_updated` windows.

use std::ops::Bound;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::entities::Entity;

/// Half-open id range `[start, end)` under lexicographic id order.
///
/// `None` on either side leaves that side unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl IdRange {
    /// The range covering every id.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    #[must_use]
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.start.as_deref().is_none_or(|s| id >= s) && self.end.as_deref().is_none_or(|e| id < e)
    }

    /// The range as `BTreeMap::range` bounds.
    #[must_use]
    pub fn bounds(&self) -> (Bound<&str>, Bound<&str>) {
        let lower = self.start.as_deref().map_or(Bound::Unbounded, Bound::Included);
        let upper = self.end.as_deref().map_or(Bound::Unbounded, Bound::Excluded);
        (lower, upper)
    }

    /// `true` when no id can fall inside the range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((&self.start, &self.end), (Some(s), Some(e)) if s >= e)
    }
}

/// Half-open window `[since, until)` over an entity's `last_updated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl TimeWindow {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            since: None,
            until: None,
        }
    }

    #[must_use]
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.since.is_none_or(|s| *ts >= s) && self.until.is_none_or(|u| *ts < u)
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }
}

/// Everything a scan may be restricted by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFilter {
    pub range: IdRange,
    pub window: TimeWindow,
}

impl ScanFilter {
    /// No restriction.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            range: IdRange::all(),
            window: TimeWindow::unbounded(),
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: IdRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub const fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.range.contains(&entity.id) && self.window.contains(&entity.last_updated)
    }
}
