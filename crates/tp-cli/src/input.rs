//! Log text ingestion.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// A loaded log and where it came from.
#[derive(Debug)]
pub struct LogInput {
    /// Display name for the report header: the file path, or `stdin`.
    pub source: String,
    pub text: String,
}

/// Reads the log from a file, or from stdin when no path (or `-`) is given.
pub fn read_log(path: Option<&Path>) -> Result<LogInput> {
    match path {
        Some(path) if path != Path::new("-") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read log file {}", path.display()))?;
            Ok(LogInput {
                source: path.display().to_string(),
                text,
            })
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read log from stdin")?;
            Ok(LogInput {
                source: "stdin".to_string(),
                text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_log_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        std::fs::write(&path, "[00:00:01] Alice's turn.\n").unwrap();

        let input = read_log(Some(&path)).unwrap();

        assert_eq!(input.text, "[00:00:01] Alice's turn.\n");
        assert!(input.source.ends_with("game.log"));
    }

    #[test]
    fn missing_file_is_an_error_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.log");

        let err = read_log(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("failed to read log file"));
    }
}
