//! Core pipeline for turn-based game log analysis.
//!
//! Three pure stages, composed in order:
//! - [`parse_lines`]: raw log text to timestamped entries
//! - [`extract_turns`]: entries to per-player turn intervals, with midnight
//!   rollover handling and minimum-duration filtering
//! - [`compute_stats`]: turns to per-player and global pacing statistics
//!
//! Data flows strictly forward; every stage is synchronous, deterministic,
//! and free of I/O. Callers own all inputs and outputs.

mod extract;
mod format;
mod parse;
mod stats;

pub use extract::{ExtractConfig, Extraction, Turn, extract_turns};
pub use format::format_time;
pub use parse::{LogEntry, parse_lines};
pub use stats::{GlobalStats, PlayerStats, StatsReport, TurnAnnotation, compute_stats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_small_game() {
        let raw = "\
[00:34:07] AmeisingEO sets counter Life to 6 (-8).
[00:34:17] AmeisingEO's turn.
[00:34:21] Astronero's turn.
[00:34:30] AmeisingEO's turn.";

        let entries = parse_lines(raw);
        assert_eq!(entries.len(), 4);

        let extraction = extract_turns(&entries, &ExtractConfig::default());
        assert_eq!(extraction.turns.len(), 2);
        assert_eq!(extraction.ignored, 1);

        let report = compute_stats(&extraction.turns);
        assert_eq!(report.by_player["AmeisingEO"].count, 1);
        assert_eq!(report.by_player["AmeisingEO"].avg, 4.0);
        assert_eq!(report.by_player["Astronero"].count, 1);
        assert_eq!(report.by_player["Astronero"].avg, 9.0);
        assert_eq!(report.global.avg, 6.5);
    }

    #[test]
    fn end_to_end_across_midnight() {
        let raw = "
[22:00:00] Alice's turn.
[22:02:00] Bob's turn.
[22:05:30] Alice's turn.
[23:59:50] Bob's turn.
[00:01:10] Alice's turn.
[00:05:00] Bob's turn.
";

        let entries = parse_lines(raw);
        let extraction = extract_turns(&entries, &ExtractConfig::default());

        for turn in &extraction.turns {
            assert!(turn.duration > 0);
        }
        for pair in extraction.turns.windows(2) {
            assert!(pair[1].start >= pair[0].start);
        }

        let report = compute_stats(&extraction.turns);
        assert_eq!(report.by_player["Alice"].durations, vec![120, 6860, 230]);
        assert_eq!(report.by_player["Bob"].durations, vec![210, 80]);
        // The 6860s turn trips the absolute outlier threshold.
        assert_eq!(report.by_player["Alice"].outliers_count, 1);
    }
}
