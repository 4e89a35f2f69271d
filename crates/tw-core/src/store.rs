//! Per-tag interval storage.

use chrono::{DateTime, Utc};

use crate::types::{Bin, Interval};

/// The closed intervals tracked for one tag, ordered by start.
///
/// Open intervals are dropped on construction: they have no duration yet.
#[derive(Debug, Clone)]
pub struct IntervalStore {
    tag: String,
    intervals: Vec<Interval>,
}

impl IntervalStore {
    pub fn new(tag: impl Into<String>, intervals: impl IntoIterator<Item = Interval>) -> Self {
        let tag = tag.into();
        let mut intervals: Vec<Interval> = intervals
            .into_iter()
            .filter(|interval| !interval.is_open())
            .collect();
        intervals.sort_by_key(|interval| interval.start);
        tracing::debug!(tag, intervals = intervals.len(), "loaded intervals");
        Self { tag, intervals }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[cfg(test)]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Intervals lying entirely inside `bin`, in start order.
    ///
    /// An interval crossing either bin edge is not returned, so it counts towards no
    /// bin at all.
    pub fn intervals_within<'a>(
        &'a self,
        bin: &Bin,
    ) -> impl Iterator<Item = &'a Interval> + use<'a> {
        let span = bin.span;
        let first = self
            .intervals
            .partition_point(|interval| interval.start < span.start());
        self.intervals[first..]
            .iter()
            .take_while(move |interval| interval.start <= span.end())
            .filter(move |interval| span.contains(interval))
    }

    /// Intervals sharing any time with `bin`, in start order.
    ///
    /// Intervals starting before the bin are still scanned: a long one may reach into it.
    pub fn overlapping<'a>(&'a self, bin: &Bin) -> impl Iterator<Item = &'a Interval> + use<'a> {
        let span = bin.span;
        self.intervals
            .iter()
            .take_while(move |interval| interval.start < span.end())
            .filter(move |interval| interval.end.is_some_and(|end| end > span.start()))
    }

    /// Earliest start and latest end over all intervals.
    pub fn extremes(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.intervals.first()?.start;
        let end = self.intervals.iter().filter_map(|interval| interval.end).max()?;
        Some((start, end))
    }
}
