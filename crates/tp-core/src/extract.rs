//! Turn reconstruction from parsed log entries.
//!
//! A turn is opened by a `<name>'s turn` line and closed by the next such
//! line (or by the end of the log). Clock values wrap at midnight, so every
//! entry is first mapped onto a monotonic absolute timeline.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::parse::LogEntry;

const SECONDS_PER_DAY: i64 = 86_400;

/// Pre-compiled regex for turn-boundary lines. Case-sensitive; the captured
/// name is everything before `'s turn`, with an optional trailing period.
static TURN_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)'s turn\.?$").unwrap());

/// Configuration for turn extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Turns shorter than this many seconds are dropped and only counted
    /// as ignored. Default: 2.
    pub min_turn_duration_secs: i64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_turn_duration_secs: 2,
        }
    }
}

/// A reconstructed interval of one player's activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Player name as captured from the boundary line.
    pub player: String,

    /// Absolute monotonic start time in seconds (clock value plus day offset).
    pub start: i64,

    /// Absolute monotonic end time in seconds, `end >= start`.
    pub end: i64,

    /// `end - start`; at least the configured minimum for surviving turns.
    pub duration: i64,
}

/// Result of turn extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Surviving turns, in the order their closing boundary was encountered.
    /// Not necessarily sorted by `start` after cross-midnight correction.
    pub turns: Vec<Turn>,

    /// Turns dropped by the minimum-duration filter.
    pub ignored: usize,
}

/// A turn that has been opened but not yet closed.
struct OpenTurn {
    player: String,
    start: i64,
}

/// Reconstructs turns from entries, in entry order.
///
/// Every boundary line closes the currently open turn (if any) and opens a
/// new one; the end of input closes the last open turn at the absolute time
/// of the final entry. Closed turns shorter than
/// [`ExtractConfig::min_turn_duration_secs`] are counted in
/// [`Extraction::ignored`] instead of being emitted.
pub fn extract_turns(entries: &[LogEntry], config: &ExtractConfig) -> Extraction {
    let absolute_times = absolute_times(entries);

    let mut turns = Vec::new();
    let mut ignored = 0;
    let mut open: Option<OpenTurn> = None;

    for (entry, &now) in entries.iter().zip(&absolute_times) {
        let Some(player) = turn_boundary(&entry.text) else {
            continue;
        };

        if let Some(turn) = open.take() {
            close_turn(turn, now, config, &mut turns, &mut ignored);
        }
        open = Some(OpenTurn {
            player: player.to_string(),
            start: now,
        });
    }

    if let (Some(turn), Some(&last)) = (open, absolute_times.last()) {
        close_turn(turn, last, config, &mut turns, &mut ignored);
    }

    Extraction { turns, ignored }
}

/// Maps each entry's clock value onto a monotonic absolute timeline, adding a
/// day's worth of seconds whenever the clock goes backwards (midnight
/// rollover). Computed for every entry, so a rollover that falls on a
/// non-boundary line is still detected.
fn absolute_times(entries: &[LogEntry]) -> Vec<i64> {
    let mut times = Vec::with_capacity(entries.len());
    let mut day_offset = 0;
    let mut prev_clock = None;

    for entry in entries {
        if prev_clock.is_some_and(|prev| entry.clock_seconds < prev) {
            day_offset += SECONDS_PER_DAY;
        }
        prev_clock = Some(entry.clock_seconds);
        times.push(entry.clock_seconds + day_offset);
    }

    times
}

/// Returns the player name if the line is a turn-boundary marker.
fn turn_boundary(text: &str) -> Option<&str> {
    let caps = TURN_BOUNDARY_RE.captures(text)?;
    Some(caps.get(1)?.as_str())
}

fn close_turn(
    open: OpenTurn,
    end: i64,
    config: &ExtractConfig,
    turns: &mut Vec<Turn>,
    ignored: &mut usize,
) {
    // Residual same-day-but-earlier artifact: keep end >= start.
    let end = if end < open.start {
        end + SECONDS_PER_DAY
    } else {
        end
    };
    let duration = end - open.start;

    if duration >= config.min_turn_duration_secs {
        tracing::debug!(player = %open.player, duration, "turn closed");
        turns.push(Turn {
            player: open.player,
            start: open.start,
            end,
            duration,
        });
    } else {
        tracing::debug!(
            player = %open.player,
            duration,
            min = config.min_turn_duration_secs,
            "turn ignored"
        );
        *ignored += 1;
    }
}
