//! Aligning several tag series onto one bin axis.
//!
//! Each tag is fetched and stored independently, so their data covers different
//! ranges. To compare them on one chart every series is aggregated over the same bins:
//! those partitioning the union of all series' extremes.

use serde::Serialize;

use crate::aggregate::Aggregator;
use crate::bins::partition;
use crate::error::StatsError;
use crate::store::IntervalStore;
use crate::types::{CalendarConfig, Granularity, SeriesResult, TimeSpan};

/// Series sharing one bin axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    /// Earliest start to latest end over all series with data.
    pub span: TimeSpan,
    pub granularity: Granularity,
    /// Series with a non-zero total, in input order.
    pub series: Vec<SeriesResult>,
}

impl Alignment {
    /// The shared bin labels.
    pub fn labels(&self) -> Vec<&str> {
        self.series
            .first()
            .map(|series| series.labels().collect())
            .unwrap_or_default()
    }

    /// Largest single bin value across all series.
    pub fn max_minutes(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|series| series.bins.iter().map(|bin| bin.minutes))
            .fold(0.0, f64::max)
    }
}

/// Builds aligned series for one granularity.
#[derive(Debug, Clone, Copy)]
pub struct SeriesAligner {
    granularity: Granularity,
    calendar: CalendarConfig,
    aggregator: Aggregator,
}

impl SeriesAligner {
    pub const fn new(
        granularity: Granularity,
        calendar: CalendarConfig,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            granularity,
            calendar,
            aggregator,
        }
    }

    /// Aggregates every store over bins covering the union of their extremes.
    ///
    /// Stores without intervals are skipped, as are series that sum to zero. Returns
    /// `None` when nothing is left to show.
    pub fn align(&self, stores: &[IntervalStore]) -> Result<Option<Alignment>, StatsError> {
        let stores: Vec<&IntervalStore> = stores.iter().filter(|store| !store.is_empty()).collect();

        let Some((start, end)) = stores
            .iter()
            .filter_map(|store| store.extremes())
            .reduce(|(start, end), (s, e)| (start.min(s), end.max(e)))
        else {
            tracing::debug!("no intervals to align");
            return Ok(None);
        };

        // All intervals are zero-length and at the same instant: nothing to chart.
        if start >= end {
            tracing::debug!(%start, "union span is empty");
            return Ok(None);
        }

        let span = TimeSpan::new(start, end)?;
        let bins = partition(&span, self.granularity, &self.calendar)?;

        let series: Vec<SeriesResult> = stores
            .iter()
            .map(|store| self.aggregator.aggregate(store, &bins))
            .filter(|series| {
                let keep = series.total_minutes() > 0.0;
                if !keep {
                    tracing::debug!(tag = %series.tag, "dropping series with no tracked time");
                }
                keep
            })
            .collect();

        if series.is_empty() {
            return Ok(None);
        }

        tracing::debug!(%span, bins = bins.len(), series = series.len(), "aligned series");
        Ok(Some(Alignment {
            span,
            granularity: self.granularity,
            series,
        }))
    }
}
