//! Log line parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pre-compiled regex for the `[H:MM:SS]` timestamp marker (hours 1-2 digits).
static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\d{1,2}):(\d{2}):(\d{2})\]\s*(.*)$").unwrap());

/// One log line with a recognized timestamp marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Seconds since local midnight, as written in the log.
    pub clock_seconds: i64,

    /// Rest of the line after the timestamp, trimmed.
    pub text: String,
}

/// Parses raw log text into timestamped entries, preserving input order.
///
/// Lines without a recognizable timestamp marker are silently dropped; they
/// are not errors. The clock fields are not range-checked beyond the grammar,
/// so `[10:99:00]` parses and carries its out-of-range clock value as written.
pub fn parse_lines(raw: &str) -> Vec<LogEntry> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let caps = TIMESTAMP_RE.captures(line)?;
            let hours: i64 = caps[1].parse().ok()?;
            let minutes: i64 = caps[2].parse().ok()?;
            let seconds: i64 = caps[3].parse().ok()?;
            Some(LogEntry {
                clock_seconds: hours * 3600 + minutes * 60 + seconds,
                text: caps[4].to_string(),
            })
        })
        .collect()
}
