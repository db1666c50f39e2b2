//! Per-player and global turn statistics.
//!
//! Everything here is recomputed from scratch on every call; there is no
//! incremental state. Aggregates only ever see surviving turns, never the
//! ones dropped by the extractor's duration filter.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::extract::Turn;

/// Absolute duration above which a turn always counts as an outlier, in
/// seconds. Catches slow turns even for players whose variance makes the
/// sigma test vacuous.
const OUTLIER_ABSOLUTE_SECS: i64 = 300;

/// Player-relative outlier threshold, in standard deviations.
const OUTLIER_SIGMA: f64 = 3.0;

/// Aggregate statistics for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub count: usize,
    pub avg: f64,
    pub min: i64,
    pub max: i64,

    /// Population standard deviation (divide by count, not count - 1).
    pub stddev: f64,

    /// Relative performance index: mean of `global avg - duration` over this
    /// player's turns. Positive means the player tends to play faster than
    /// the global average.
    pub ipr: f64,

    /// Rounded percentage of this player's turns strictly faster than the
    /// global average.
    pub percent_faster: u32,

    pub outliers_count: usize,

    /// Raw durations backing the aggregates, in turn order.
    pub durations: Vec<i64>,
}

/// Aggregate statistics over the pooled turns of all players.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalStats {
    pub avg: f64,
    pub stddev: f64,
    pub longest: i64,
    pub shortest: i64,
    pub more_than_avg: usize,
    pub less_than_avg: usize,
}

/// Derived flags for a single turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnAnnotation {
    /// More than 3 standard deviations from the player's own average, or
    /// over the absolute 300-second threshold. Player-relative, not
    /// global-relative.
    pub is_outlier: bool,

    /// Signed seconds versus the global average; positive means faster.
    pub delta_to_global: f64,

    pub faster_than_global: bool,
}

/// Result of a statistics run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    /// Keys are exactly the players with at least one surviving turn.
    pub by_player: BTreeMap<String, PlayerStats>,

    pub global: GlobalStats,

    /// One annotation per input turn, parallel by index.
    pub annotations: Vec<TurnAnnotation>,
}

/// Computes per-player and global statistics over the given turns.
///
/// Deterministic and stateless: the same input always yields the same
/// report. An empty turn slice is a normal outcome and produces an empty
/// `by_player` map with all global values defined as zero.
#[allow(clippy::cast_precision_loss)]
pub fn compute_stats(turns: &[Turn]) -> StatsReport {
    let mut durations_by_player: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for turn in turns {
        durations_by_player
            .entry(&turn.player)
            .or_default()
            .push(turn.duration);
    }

    let all_durations: Vec<i64> = turns.iter().map(|t| t.duration).collect();
    let global_avg = mean(&all_durations);

    let mut by_player = BTreeMap::new();
    for (player, durations) in durations_by_player {
        let avg = mean(&durations);
        let sd = stddev(&durations);
        let faster = durations
            .iter()
            .filter(|&&d| (d as f64) < global_avg)
            .count();
        let outliers_count = durations
            .iter()
            .filter(|&&d| is_outlier(d, avg, sd))
            .count();

        by_player.insert(
            player.to_string(),
            PlayerStats {
                count: durations.len(),
                avg,
                min: durations.iter().copied().min().unwrap_or(0),
                max: durations.iter().copied().max().unwrap_or(0),
                stddev: sd,
                // Mean of (global avg - d) collapses to global avg - player avg.
                ipr: global_avg - avg,
                percent_faster: percent(faster, durations.len()),
                outliers_count,
                durations,
            },
        );
    }

    let global = GlobalStats {
        avg: global_avg,
        stddev: stddev(&all_durations),
        longest: all_durations.iter().copied().max().unwrap_or(0),
        shortest: all_durations.iter().copied().min().unwrap_or(0),
        more_than_avg: all_durations
            .iter()
            .filter(|&&d| d as f64 > global_avg)
            .count(),
        less_than_avg: all_durations
            .iter()
            .filter(|&&d| (d as f64) < global_avg)
            .count(),
    };

    let annotations = turns
        .iter()
        .map(|turn| {
            let (avg, sd) = by_player
                .get(turn.player.as_str())
                .map_or((0.0, 0.0), |s| (s.avg, s.stddev));
            TurnAnnotation {
                is_outlier: is_outlier(turn.duration, avg, sd),
                delta_to_global: global_avg - turn.duration as f64,
                faster_than_global: (turn.duration as f64) < global_avg,
            }
        })
        .collect();

    StatsReport {
        by_player,
        global,
        annotations,
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(durations: &[i64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<i64>() as f64 / durations.len() as f64
}

/// Population standard deviation; 0 for the empty slice.
#[allow(clippy::cast_precision_loss)]
fn stddev(durations: &[i64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let mean = mean(durations);
    let variance = durations
        .iter()
        .map(|&d| {
            let delta = d as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / durations.len() as f64;
    variance.sqrt()
}

#[allow(clippy::cast_precision_loss)]
fn is_outlier(duration: i64, player_avg: f64, player_stddev: f64) -> bool {
    (duration as f64 - player_avg).abs() > OUTLIER_SIGMA * player_stddev
        || duration > OUTLIER_ABSOLUTE_SECS
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(player: &str, duration: i64) -> Turn {
        Turn {
            player: player.to_string(),
            start: 0,
            end: duration,
            duration,
        }
    }

    #[test]
    fn empty_turns_yield_zero_defaults() {
        let report = compute_stats(&[]);

        assert!(report.by_player.is_empty());
        assert!(report.annotations.is_empty());
        assert_eq!(report.global.avg, 0.0);
        assert_eq!(report.global.stddev, 0.0);
        assert_eq!(report.global.longest, 0);
        assert_eq!(report.global.shortest, 0);
        assert_eq!(report.global.more_than_avg, 0);
        assert_eq!(report.global.less_than_avg, 0);
    }

    #[test]
    fn global_and_per_player_averages() {
        let turns = vec![turn("AmeisingEO", 4), turn("Astronero", 9)];

        let report = compute_stats(&turns);

        assert_eq!(report.global.avg, 6.5);
        assert_eq!(report.by_player["AmeisingEO"].count, 1);
        assert_eq!(report.by_player["AmeisingEO"].avg, 4.0);
        assert_eq!(report.by_player["Astronero"].count, 1);
        assert_eq!(report.by_player["Astronero"].avg, 9.0);
        assert_eq!(report.global.longest, 9);
        assert_eq!(report.global.shortest, 4);
    }

    #[test]
    fn stddev_is_population_not_sample() {
        // Classic fixture: mean 5, population stddev exactly 2
        // (the sample version would give ~2.14).
        let turns: Vec<Turn> = [2, 4, 4, 4, 5, 5, 7, 9]
            .iter()
            .map(|&d| turn("Alice", d))
            .collect();

        let report = compute_stats(&turns);

        let alice = &report.by_player["Alice"];
        assert_eq!(alice.avg, 5.0);
        assert_eq!(alice.stddev, 2.0);
        assert_eq!(report.global.stddev, 2.0);
    }

    #[test]
    fn percent_faster_is_rounded() {
        // Global avg 20; one of three turns is strictly faster: 33.33 -> 33.
        let turns = vec![turn("Alice", 10), turn("Alice", 20), turn("Alice", 30)];
        let report = compute_stats(&turns);
        assert_eq!(report.by_player["Alice"].percent_faster, 33);

        // Two of three faster: 66.67 -> 67.
        let turns = vec![turn("Bob", 10), turn("Bob", 15), turn("Bob", 50)];
        let report = compute_stats(&turns);
        assert_eq!(report.by_player["Bob"].percent_faster, 67);
    }

    #[test]
    fn ipr_sign_tracks_relative_pace() {
        let turns = vec![
            turn("Alice", 10),
            turn("Alice", 20),
            turn("Alice", 30),
            turn("Bob", 40),
        ];

        let report = compute_stats(&turns);

        // Global avg 25; Alice averages 20, Bob 40.
        assert_eq!(report.by_player["Alice"].ipr, 5.0);
        assert_eq!(report.by_player["Bob"].ipr, -15.0);
    }

    #[test]
    fn strict_comparisons_skip_turns_at_the_average() {
        let turns = vec![turn("Alice", 10), turn("Bob", 10)];

        let report = compute_stats(&turns);

        assert_eq!(report.global.avg, 10.0);
        assert_eq!(report.global.more_than_avg, 0);
        assert_eq!(report.global.less_than_avg, 0);
        assert_eq!(report.by_player["Alice"].percent_faster, 0);
    }

    #[test]
    fn absolute_threshold_marks_long_turns_as_outliers() {
        // A single 301s turn: the sigma test is vacuous (deviation from its
        // own average is 0) but the absolute threshold still fires.
        let turns = vec![turn("Alice", 301)];

        let report = compute_stats(&turns);

        assert_eq!(report.by_player["Alice"].outliers_count, 1);
        assert!(report.annotations[0].is_outlier);
    }

    #[test]
    fn single_turn_under_threshold_is_not_an_outlier() {
        let turns = vec![turn("Alice", 200)];

        let report = compute_stats(&turns);

        assert_eq!(report.by_player["Alice"].outliers_count, 0);
        assert!(!report.annotations[0].is_outlier);
    }

    #[test]
    fn sigma_rule_marks_player_relative_outliers() {
        // Ten 10s turns plus one 120s spike: the spike sits 100s from the
        // player average with 3*stddev ~ 94.9s, so the sigma rule fires
        // without help from the absolute threshold.
        let mut turns: Vec<Turn> = (0..10).map(|_| turn("Alice", 10)).collect();
        turns.push(turn("Alice", 120));

        let report = compute_stats(&turns);

        assert_eq!(report.by_player["Alice"].outliers_count, 1);
        assert!(report.annotations[10].is_outlier);
        assert!(report.annotations[..10].iter().all(|a| !a.is_outlier));
    }

    #[test]
    fn annotations_are_parallel_to_input_order() {
        let turns = vec![turn("Bob", 40), turn("Alice", 10)];

        let report = compute_stats(&turns);

        // Global avg 25. Annotation order matches input order, not the
        // sorted by_player order.
        assert_eq!(report.annotations.len(), 2);
        assert_eq!(report.annotations[0].delta_to_global, -15.0);
        assert!(!report.annotations[0].faster_than_global);
        assert_eq!(report.annotations[1].delta_to_global, 15.0);
        assert!(report.annotations[1].faster_than_global);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let turns = vec![
            turn("Alice", 12),
            turn("Bob", 301),
            turn("Alice", 47),
            turn("Carol", 3),
        ];

        let first = compute_stats(&turns);
        let second = compute_stats(&turns);

        assert_eq!(first, second);
    }

    #[test]
    fn by_player_keys_are_exactly_the_surviving_players() {
        let turns = vec![turn("Alice", 10), turn("Bob", 20), turn("Alice", 30)];

        let report = compute_stats(&turns);

        let players: Vec<&str> = report.by_player.keys().map(String::as_str).collect();
        assert_eq!(players, vec!["Alice", "Bob"]);
        assert_eq!(report.by_player["Alice"].durations, vec![10, 30]);
    }
}
