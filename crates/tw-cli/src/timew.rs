//! Timewarrior subprocess calls.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::Context;
use tw_core::export::format_timestamp;
use tw_core::{Interval, StatsError, TimeSpan, TrackingStatus, parse_export, parse_tracking_status};

/// Handle on the `timew` executable.
#[derive(Debug, Clone)]
pub struct Timew {
    binary: PathBuf,
}

impl Timew {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Exports the intervals tagged `tag` that intersect `span`.
    ///
    /// Runs `timew export <start> - <end> <tag>`.
    pub fn export(&self, span: &TimeSpan, tag: &str) -> Result<Vec<Interval>, StatsError> {
        let fetch_failure = |message: String| StatsError::FetchFailure {
            tag: tag.to_string(),
            message,
            source: None,
        };

        let output = Command::new(&self.binary)
            .arg("export")
            .arg(format_timestamp(span.start()))
            .arg("-")
            .arg(format_timestamp(span.end()))
            .arg(tag)
            .output()
            .map_err(|err| {
                fetch_failure(format!("failed to run {}: {err}", self.binary.display()))
            })?;

        if !output.status.success() {
            return Err(fetch_failure(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|err| fetch_failure(format!("export is not valid UTF-8: {err}")))?;
        let intervals = parse_export(&stdout).map_err(|err| StatsError::FetchFailure {
            tag: tag.to_string(),
            message: "unreadable export".to_string(),
            source: Some(Box::new(err)),
        })?;
        tracing::debug!(tag, intervals = intervals.len(), "exported intervals");
        Ok(intervals)
    }

    /// Returns what is being tracked right now, if anything.
    ///
    /// Runs `timew` without arguments.
    pub fn status(&self) -> anyhow::Result<Option<TrackingStatus>> {
        let Output { stdout, .. } = Command::new(&self.binary)
            .output()
            .with_context(|| format!("failed to run {}", self.binary.display()))?;
        let stdout = String::from_utf8_lossy(&stdout);
        Ok(parse_tracking_status(&stdout))
    }
}
