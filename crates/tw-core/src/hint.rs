//! Time span hints.
//!
//! A hint describes how far back a report reaches: a bare unit (`"week"`), a unit
//! prefixed with `last` (`"last month"`), a relative phrase (`"45 days ago"`), or an
//! absolute date. [`TimeSpanResolver`] normalizes the hint and delegates the actual
//! parsing to a [`HintParser`]; the parsed instant becomes the span start and the
//! supplied `now` its end.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::bins::local_midnight_to_utc;
use crate::error::StatsError;
use crate::types::TimeSpan;

/// Units accepted both as bare hints and in relative phrases.
const RELATIVE_UNITS: [&str; 6] = ["minute", "hour", "day", "week", "month", "year"];

/// Pre-compiled regex for relative phrases.
static RELATIVE_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s+(minute|hour|day|week|month|year)s?\s+ago$").unwrap()
});

/// Turns a normalized hint into an instant.
///
/// Parsers receive hints already normalized by [`normalize_hint`], so a bare unit
/// always arrives as `"1 <unit> ago"`.
pub trait HintParser {
    /// Returns the instant the hint refers to, or `None` if it is not understood.
    fn parse(&self, hint: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Normalizes a hint before parsing.
///
/// Trims, drops a leading `last`, and expands a single unit word to `"1 <unit> ago"`.
/// Anything else passes through unchanged.
pub fn normalize_hint(hint: &str) -> String {
    let trimmed = hint.trim();
    let rest = strip_last(trimmed).unwrap_or(trimmed);
    let unit = rest.to_lowercase();

    if is_relative_unit(&unit) {
        format!("1 {unit} ago")
    } else {
        rest.to_string()
    }
}

fn strip_last(hint: &str) -> Option<&str> {
    let prefix = hint.get(..4)?;
    let rest = &hint[4..];
    let is_word = rest.is_empty() || rest.starts_with(char::is_whitespace);
    (prefix.eq_ignore_ascii_case("last") && is_word).then(|| rest.trim_start())
}

fn is_relative_unit(word: &str) -> bool {
    let singular = word.strip_suffix('s').unwrap_or(word);
    RELATIVE_UNITS.contains(&singular)
}

/// Resolves hints into concrete spans ending at a known instant.
#[derive(Debug, Clone)]
pub struct TimeSpanResolver<P> {
    parser: P,
}

impl<P: HintParser> TimeSpanResolver<P> {
    pub const fn new(parser: P) -> Self {
        Self { parser }
    }

    /// Resolves `hint` into `[start, now)`.
    pub fn resolve(&self, hint: &str, now: DateTime<Utc>) -> Result<TimeSpan, StatsError> {
        let normalized = normalize_hint(hint);
        let start = self
            .parser
            .parse(&normalized, now)
            .ok_or_else(|| StatsError::InvalidHint {
                hint: hint.to_string(),
            })?;
        let span = TimeSpan::new(start, now)?;
        tracing::debug!(hint, normalized, %span, "resolved time span");
        Ok(span)
    }
}

/// Built-in parser for relative phrases and absolute dates.
///
/// Supports:
/// - Relative: "45 days ago", "1 month ago", "2 years ago"
/// - RFC 3339: "2023-01-15T10:30:00Z"
/// - Dates: "2023-01-15" (local midnight in the configured timezone)
#[derive(Debug, Clone, Copy)]
pub struct RelativeHintParser {
    timezone: Tz,
}

impl RelativeHintParser {
    pub const fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    fn parse_relative(hint: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let caps = RELATIVE_HINT_RE.captures(hint)?;
        let n: u32 = caps[1].parse().ok()?;

        match caps[2].to_ascii_lowercase().as_str() {
            "month" => now.checked_sub_months(Months::new(n)),
            "year" => now.checked_sub_months(Months::new(n.checked_mul(12)?)),
            unit => {
                let n = i64::from(n);
                let duration = match unit {
                    "minute" => Duration::try_minutes(n),
                    "hour" => Duration::try_hours(n),
                    "day" => Duration::try_days(n),
                    "week" => Duration::try_weeks(n),
                    _ => None,
                }?;
                now.checked_sub_signed(duration)
            }
        }
    }
}

impl Default for RelativeHintParser {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

impl HintParser for RelativeHintParser {
    fn parse(&self, hint: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(instant) = Self::parse_relative(hint, now) {
            return Some(instant);
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(hint) {
            return Some(instant.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(hint, "%Y-%m-%d").ok()?;
        Some(local_midnight_to_utc(date, self.timezone))
    }
}
