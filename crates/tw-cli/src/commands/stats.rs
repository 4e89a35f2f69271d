//! Stats command: minutes per tag, bucketed by calendar unit.
//!
//! This module implements `twtools stats <hint> <granularity> <tag>...` with
//! human-readable (bar chart) and JSON output.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tw_core::{
    Aggregator, Alignment, Granularity, IntervalStore, RelativeHintParser, SeriesAligner,
    SeriesResult, TimeSpan, TimeSpanResolver,
};

use crate::config::{Config, FetchFailurePolicy};
use crate::timew::Timew;

/// What to report on.
#[derive(Debug, Clone, Copy)]
pub struct StatsRequest<'a> {
    pub hint: &'a str,
    pub granularity: Granularity,
    pub tags: &'a [String],
}

/// Computed report data.
#[derive(Debug)]
pub struct StatsReport {
    pub generated_at: DateTime<Utc>,
    pub hint: String,
    pub granularity: Granularity,
    pub tags: Vec<String>,
    /// `None` when no tag had any tracked time.
    pub alignment: Option<Alignment>,
}

// ========== Report Generation ==========

/// Exports every tag, in parallel, and applies the fetch failure policy.
///
/// Stores come back in tag order.
fn fetch_stores(
    timew: &Timew,
    span: &TimeSpan,
    tags: &[String],
    policy: FetchFailurePolicy,
) -> Result<Vec<IntervalStore>> {
    let fetched: Vec<_> = tags
        .par_iter()
        .map(|tag| (tag, timew.export(span, tag)))
        .collect();

    let mut stores = Vec::with_capacity(fetched.len());
    for (tag, result) in fetched {
        match result {
            Ok(intervals) => stores.push(IntervalStore::new(tag.clone(), intervals)),
            Err(err) => match policy {
                FetchFailurePolicy::Abort => return Err(err.into()),
                FetchFailurePolicy::Skip => {
                    tracing::warn!(tag, error = %err, "skipping tag");
                }
            },
        }
    }
    Ok(stores)
}

/// Generates report data by exporting each tag from Timewarrior.
pub fn generate_stats(
    timew: &Timew,
    config: &Config,
    request: StatsRequest<'_>,
    generated_at: DateTime<Utc>,
) -> Result<StatsReport> {
    let calendar = config.calendar()?;
    let resolver = TimeSpanResolver::new(RelativeHintParser::new(calendar.timezone));
    let span = resolver
        .resolve(request.hint, generated_at)
        .context("failed to resolve time span")?;

    let stores = fetch_stores(timew, &span, request.tags, config.on_fetch_failure)?;

    let aligner = SeriesAligner::new(
        request.granularity,
        calendar,
        Aggregator::new(config.attribution),
    );
    let alignment = aligner.align(&stores)?;

    Ok(StatsReport {
        generated_at,
        hint: request.hint.to_string(),
        granularity: request.granularity,
        tags: request.tags.to_vec(),
        alignment,
    })
}

// ========== Duration Formatting ==========

/// Formats minutes as a duration string, rounded to whole minutes.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
#[allow(clippy::cast_possible_truncation)]
pub fn format_minutes(minutes: f64) -> String {
    if minutes.is_nan() || minutes <= 0.0 {
        return "0m".to_string();
    }
    let total_minutes = minutes.round() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

// ========== Progress Bar ==========

/// Generates a 10-character bar scaled against `max`.
/// Non-zero values below 5% of max get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value / max;
    let filled = if ratio < 0.05 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Human Output ==========

/// Formats the human-readable report: one bar chart per tag on a shared scale.
pub fn format_stats(report: &StatsReport) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "TIME STATS: {} by {}",
        report.hint, report.granularity
    )
    .unwrap();

    let Some(alignment) = &report.alignment else {
        writeln!(output).unwrap();
        writeln!(output, "No tracked time for {}.", report.tags.join(", ")).unwrap();
        return output;
    };

    let max = alignment.max_minutes();
    let width = alignment
        .labels()
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);

    for series in &alignment.series {
        writeln!(output).unwrap();
        writeln!(output, "{}", series.tag).unwrap();
        writeln!(output, "{}", "─".repeat(series.tag.chars().count())).unwrap();

        for bin in &series.bins {
            let duration = format_minutes(bin.minutes);
            let bar = progress_bar(bin.minutes, max);
            writeln!(output, "  {:<width$}  {duration:>7}  {bar}", bin.label).unwrap();
        }

        writeln!(
            output,
            "  Total: {}",
            format_minutes(series.total_minutes())
        )
        .unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonStats<'a> {
    pub generated_at: String,
    pub hint: &'a str,
    pub granularity: Granularity,
    pub span: Option<&'a TimeSpan>,
    pub series: &'a [SeriesResult],
}

/// Formats report data as JSON. Minutes are not rounded.
pub fn format_stats_json(report: &StatsReport) -> Result<String> {
    let json = JsonStats {
        generated_at: report.generated_at.to_rfc3339(),
        hint: &report.hint,
        granularity: report.granularity,
        span: report.alignment.as_ref().map(|alignment| &alignment.span),
        series: report
            .alignment
            .as_ref()
            .map_or(&[][..], |alignment| alignment.series.as_slice()),
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Runs the stats command.
pub fn run(config: &Config, request: StatsRequest<'_>, json: bool) -> Result<()> {
    let timew = Timew::new(config.timew_binary.clone());
    let report = generate_stats(&timew, config, request, Utc::now())?;

    if json {
        let output = format_stats_json(&report)?;
        println!("{output}");
    } else {
        let output = format_stats(&report);
        print!("{output}");
    }

    Ok(())
}
