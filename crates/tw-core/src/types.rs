//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// A tracked interval as exported by Timewarrior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Timewarrior's positional id (`@1` is the most recent interval).
    pub id: Option<u64>,
    pub start: DateTime<Utc>,
    /// `None` while the interval is still being tracked.
    pub end: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl Interval {
    /// Creates a closed interval, rejecting one that ends before it starts.
    pub fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, StatsError> {
        if end < start {
            return Err(StatsError::InvertedInterval { start, end });
        }
        Ok(Self {
            id: None,
            start,
            end: Some(end),
            tags: Vec::new(),
        })
    }

    /// Creates an interval that is still running.
    pub const fn open(start: DateTime<Utc>) -> Self {
        Self {
            id: None,
            start,
            end: None,
            tags: Vec::new(),
        }
    }

    /// Returns true while the interval has no end.
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Tracked duration, or `None` for an open interval.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }
}

/// A half-open time range `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSpan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSpan {
    /// Creates a span, failing with [`StatsError::EmptySpan`] unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, StatsError> {
        if start >= end {
            return Err(StatsError::EmptySpan { start, end });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Strict containment: the whole interval lies inside the span.
    ///
    /// Open intervals are never contained.
    pub fn contains(&self, interval: &Interval) -> bool {
        interval
            .end
            .is_some_and(|end| interval.start >= self.start && end <= self.end)
    }

    /// Length of the part of `interval` that falls inside the span.
    pub fn overlap(&self, interval: &Interval) -> Duration {
        let Some(end) = interval.end else {
            return Duration::zero();
        };
        let start = interval.start.max(self.start);
        let end = end.min(self.end);
        if end > start {
            end - start
        } else {
            Duration::zero()
        }
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Calendar unit used as bin width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(StatsError::UnknownGranularity(s.to_string())),
        }
    }
}

/// First day of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// How an interval's duration is credited to bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribution {
    /// Only intervals lying entirely inside a bin count, with their full duration.
    /// Intervals crossing a bin boundary count nowhere.
    #[default]
    Containment,
    /// Every interval is split across the bins it overlaps.
    Overlap,
}

/// Calendar settings used for bin alignment and date-only hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarConfig {
    pub week_start: WeekStart,
    pub timezone: Tz,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Monday,
            timezone: chrono_tz::UTC,
        }
    }
}

/// One calendar-aligned histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    pub span: TimeSpan,
    pub label: String,
}

/// Summed minutes for one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinValue {
    pub label: String,
    pub minutes: f64,
}

/// Per-bin minutes for one tag, in bin order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesResult {
    pub tag: String,
    pub bins: Vec<BinValue>,
}

impl SeriesResult {
    pub fn total_minutes(&self) -> f64 {
        self.bins.iter().map(|bin| bin.minutes).sum()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bins.iter().map(|bin| bin.label.as_str())
    }
}
