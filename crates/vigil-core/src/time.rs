//! Timestamp rendering for audit messages.

use chrono::{DateTime, Utc};

/// Render a timestamp the way Python's `str(datetime)` renders a naive UTC
/// value: `YYYY-MM-DD HH:MM:SS`, with `.ffffff` appended only when the
/// microsecond component is non-zero.
#[must_use]
pub fn py_datetime(ts: &DateTime<Utc>) -> String {
    let base = ts.format("%Y-%m-%d %H:%M:%S").to_string();
    match ts.timestamp_subsec_micros() {
        0 => base,
        micros => format!("{base}.{micros:06}"),
    }
}
