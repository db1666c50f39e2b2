//! Report generation: runs the analysis pipeline over raw log text and
//! renders the result as human-readable text or JSON.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tp_core::{
    ExtractConfig, Extraction, GlobalStats, PlayerStats, StatsReport, format_time,
};

use crate::input::LogInput;

/// Everything the renderers need, computed once per invocation.
#[derive(Debug)]
pub struct ReportData<'a> {
    pub source: &'a str,
    pub min_turn_duration_secs: i64,
    pub extraction: &'a Extraction,
    pub stats: &'a StatsReport,
}

/// Runs the three pipeline stages over raw log text.
fn analyze(raw: &str, min_turn_duration_secs: i64) -> (Extraction, StatsReport) {
    let entries = tp_core::parse_lines(raw);
    tracing::debug!(entries = entries.len(), "parsed log lines");

    let config = ExtractConfig {
        min_turn_duration_secs,
    };
    let extraction = tp_core::extract_turns(&entries, &config);
    tracing::debug!(
        turns = extraction.turns.len(),
        ignored = extraction.ignored,
        "extracted turns"
    );

    let stats = tp_core::compute_stats(&extraction.turns);
    (extraction, stats)
}

// ========== Human-Readable Output ==========

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData<'_>) -> String {
    let mut output = String::new();

    writeln!(output, "TURN REPORT: {}", data.source).unwrap();

    if data.stats.by_player.is_empty() {
        writeln!(output).unwrap();
        writeln!(
            output,
            "No valid turns found (minimum duration {}s).",
            data.min_turn_duration_secs
        )
        .unwrap();
        if data.extraction.ignored > 0 {
            writeln!(output, "Ignored turns: {}", data.extraction.ignored).unwrap();
        }
        return output;
    }

    writeln!(output).unwrap();
    writeln!(output, "PLAYERS").unwrap();
    writeln!(output, "───────").unwrap();

    for (player, stats) in &data.stats.by_player {
        writeln!(output).unwrap();
        writeln!(output, "{player}").unwrap();
        writeln!(output, "  Turns:              {}", stats.count).unwrap();
        writeln!(output, "  Average:            {}", format_time(stats.avg)).unwrap();
        writeln!(
            output,
            "  Shortest:           {}",
            format_time(seconds(stats.min))
        )
        .unwrap();
        writeln!(
            output,
            "  Longest:            {}",
            format_time(seconds(stats.max))
        )
        .unwrap();
        writeln!(output, "  Stddev:             {:.2}s", stats.stddev).unwrap();
        writeln!(output, "  IPR:                {:+.2}s", stats.ipr).unwrap();
        writeln!(output, "  Faster than global: {}%", stats.percent_faster).unwrap();
        writeln!(output, "  Outliers:           {}", stats.outliers_count).unwrap();
    }

    let global = &data.stats.global;
    writeln!(output).unwrap();
    writeln!(output, "GLOBAL").unwrap();
    writeln!(output, "──────").unwrap();
    writeln!(output, "Average:           {}", format_time(global.avg)).unwrap();
    writeln!(output, "Stddev:            {:.2}s", global.stddev).unwrap();
    writeln!(
        output,
        "Longest turn:      {}",
        format_time(seconds(global.longest))
    )
    .unwrap();
    writeln!(
        output,
        "Shortest turn:     {}",
        format_time(seconds(global.shortest))
    )
    .unwrap();
    writeln!(output, "Turns > average:   {}", global.more_than_avg).unwrap();
    writeln!(output, "Turns < average:   {}", global.less_than_avg).unwrap();

    let ignored_label = format!("Ignored (< {}s):", data.min_turn_duration_secs);
    writeln!(output, "{ignored_label:<18} {}", data.extraction.ignored).unwrap();

    output
}

#[allow(clippy::cast_precision_loss)]
fn seconds(duration: i64) -> f64 {
    duration as f64
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: String,
    pub source: &'a str,
    pub min_turn_duration_secs: i64,
    pub by_player: &'a BTreeMap<String, PlayerStats>,
    pub global: &'a GlobalStats,
    pub turns: Vec<JsonTurn<'a>>,
    pub ignored: usize,
}

/// One turn with its derived flags, flattened for JSON consumers.
#[derive(Debug, Serialize)]
pub struct JsonTurn<'a> {
    pub player: &'a str,
    pub start: i64,
    pub end: i64,
    pub duration: i64,
    pub is_outlier: bool,
    pub delta_to_global: f64,
    pub faster_than_global: bool,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData<'_>, generated_at: DateTime<Utc>) -> Result<String> {
    let turns = data
        .extraction
        .turns
        .iter()
        .zip(&data.stats.annotations)
        .map(|(turn, annotation)| JsonTurn {
            player: &turn.player,
            start: turn.start,
            end: turn.end,
            duration: turn.duration,
            is_outlier: annotation.is_outlier,
            delta_to_global: annotation.delta_to_global,
            faster_than_global: annotation.faster_than_global,
        })
        .collect();

    let report = JsonReport {
        generated_at: generated_at.to_rfc3339(),
        source: data.source,
        min_turn_duration_secs: data.min_turn_duration_secs,
        by_player: &data.stats.by_player,
        global: &data.stats.global,
        turns,
        ignored: data.extraction.ignored,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(input: &LogInput, min_turn_duration_secs: i64, json: bool) -> Result<()> {
    let (extraction, stats) = analyze(&input.text, min_turn_duration_secs);
    let data = ReportData {
        source: &input.source,
        min_turn_duration_secs,
        extraction: &extraction,
        stats: &stats,
    };

    if json {
        let output = format_report_json(&data, Utc::now())?;
        println!("{output}");
    } else {
        let output = format_report(&data);
        print!("{output}");
    }

    Ok(())
}
