//! Core domain logic for Timewarrior statistics.
//!
//! This crate turns tracked intervals into calendar-aligned bar chart data:
//! - Hints: resolving "last month" or "45 days ago" into a concrete span
//! - Bins: splitting a span into day/week/month/year buckets
//! - Aggregation: summing interval minutes per bucket
//! - Alignment: putting several tags on one shared bucket axis

mod aggregate;
mod align;
pub mod bins;
mod error;
pub mod export;
pub mod hint;
pub mod status;
mod store;
mod types;

pub use aggregate::Aggregator;
pub use align::{Alignment, SeriesAligner};
pub use bins::partition;
pub use error::StatsError;
pub use export::parse_export;
pub use hint::{HintParser, RelativeHintParser, TimeSpanResolver};
pub use status::{TrackingStatus, parse_tracking_status};
pub use store::IntervalStore;
pub use types::{
    Attribution, Bin, BinValue, CalendarConfig, Granularity, Interval, SeriesResult, TimeSpan,
    WeekStart,
};
