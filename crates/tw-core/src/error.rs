//! Engine error type.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced while resolving, fetching or bucketing intervals.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The time span hint could not be turned into a start instant.
    #[error("invalid time span hint: {hint:?}")]
    InvalidHint { hint: String },

    /// The span has zero or negative width.
    #[error("empty time span: {start} is not before {end}")]
    EmptySpan {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Fetching intervals for a tag failed.
    #[error("failed to fetch intervals for tag {tag}: {message}")]
    FetchFailure {
        tag: String,
        message: String,
        #[source]
        source: Option<Box<StatsError>>,
    },

    /// The export contained something other than a JSON array of intervals.
    #[error("malformed interval export: {0}")]
    MalformedExport(#[from] serde_json::Error),

    /// A timestamp was not in `YYYYMMDDTHHMMSSZ` form.
    #[error("invalid timestamp: {value}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// An interval ends before it starts.
    #[error("interval {start} - {end} ends before it starts")]
    InvertedInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Not one of day, week, month, year.
    #[error("unknown granularity: {0} (expected day, week, month or year)")]
    UnknownGranularity(String),

    /// Calendar arithmetic left the representable range.
    #[error("date out of range while building bins")]
    OutOfRange,
}
