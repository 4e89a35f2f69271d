//! Per-bin duration sums.

use chrono::Duration;

use crate::store::IntervalStore;
use crate::types::{Attribution, Bin, BinValue, SeriesResult};

/// Converts a duration to fractional minutes.
#[allow(clippy::cast_precision_loss)]
fn minutes(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 60_000.0
}

/// Sums interval durations into bins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    attribution: Attribution,
}

impl Aggregator {
    pub const fn new(attribution: Attribution) -> Self {
        Self { attribution }
    }

    /// Produces one value per bin, in bin order.
    ///
    /// Bins without matching intervals get `0.0`. Values are not rounded.
    pub fn aggregate(&self, store: &IntervalStore, bins: &[Bin]) -> SeriesResult {
        let bins = bins
            .iter()
            .map(|bin| BinValue {
                label: bin.label.clone(),
                minutes: self.bin_minutes(store, bin),
            })
            .collect();

        SeriesResult {
            tag: store.tag().to_string(),
            bins,
        }
    }

    fn bin_minutes(&self, store: &IntervalStore, bin: &Bin) -> f64 {
        match self.attribution {
            Attribution::Containment => store
                .intervals_within(bin)
                .filter_map(|interval| interval.duration())
                .map(minutes)
                .sum(),
            Attribution::Overlap => store
                .overlapping(bin)
                .map(|interval| minutes(bin.span.overlap(interval)))
                .sum(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::bins::partition;
    use crate::hint::{RelativeHintParser, TimeSpanResolver};
    use crate::types::{CalendarConfig, Granularity, Interval, TimeSpan};
    use chrono::{DateTime, TimeZone, Utc};

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, d, h, m, 0).unwrap()
    }

    fn closed(start: DateTime<Utc>, end: DateTime<Utc>) -> Interval {
        Interval::closed(start, end).unwrap()
    }

    fn january_days() -> Vec<Bin> {
        let span = TimeSpan::new(utc(1, 0, 0), Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap())
            .unwrap();
        partition(&span, Granularity::Day, &CalendarConfig::default()).unwrap()
    }

    fn values(series: &SeriesResult) -> Vec<f64> {
        series.bins.iter().map(|bin| bin.minutes).collect()
    }

    #[test]
    fn test_single_interval_in_month_of_days() {
        let store = IntervalStore::new("coding", vec![closed(utc(1, 9, 0), utc(1, 10, 0))]);
        let series = Aggregator::default().aggregate(&store, &january_days());

        assert_eq!(series.tag, "coding");
        assert_eq!(series.bins.len(), 31);
        assert_eq!(series.bins[0].label, "1");
        assert!((series.bins[0].minutes - 60.0).abs() < f64::EPSILON);
        assert!(series.bins[1..].iter().all(|bin| bin.minutes == 0.0));
    }

    #[test]
    fn test_month_hint_by_day() {
        let now = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        let span = TimeSpanResolver::new(RelativeHintParser::default())
            .resolve("month", now)
            .unwrap();
        assert_eq!(span.start(), utc(1, 0, 0));
        assert_eq!(span.end(), now);

        let bins = partition(&span, Granularity::Day, &CalendarConfig::default()).unwrap();
        let store = IntervalStore::new("coding", vec![closed(utc(1, 9, 0), utc(1, 10, 0))]);
        let series = Aggregator::default().aggregate(&store, &bins);

        assert_eq!(series.bins.len(), 31);
        assert_eq!(series.bins[0].label, "1");
        assert_eq!(series.bins[0].minutes, 60.0);
        assert!(series.bins[1..].iter().all(|bin| bin.minutes == 0.0));
    }

    #[test]
    fn test_sums_multiple_intervals_with_fractions() {
        let store = IntervalStore::new(
            "coding",
            vec![
                closed(utc(2, 9, 0), utc(2, 9, 45)),
                closed(utc(2, 13, 0), utc(2, 13, 0) + Duration::seconds(90)),
            ],
        );
        let series = Aggregator::default().aggregate(&store, &january_days());

        assert!((series.bins[1].minutes - 46.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_straddling_interval_counts_nowhere() {
        // 23:00 on Jan 1 to 01:00 on Jan 2 crosses the day boundary
        let store = IntervalStore::new(
            "coding",
            vec![
                closed(utc(1, 23, 0), utc(2, 1, 0)),
                closed(utc(3, 9, 0), utc(3, 9, 30)),
            ],
        );
        let series = Aggregator::default().aggregate(&store, &january_days());

        assert_eq!(series.bins[0].minutes, 0.0);
        assert_eq!(series.bins[1].minutes, 0.0);
        assert!((series.bins[2].minutes - 30.0).abs() < f64::EPSILON);
        assert!((series.total_minutes() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overlap_attribution_splits_straddling_interval() {
        let store = IntervalStore::new("coding", vec![closed(utc(1, 23, 0), utc(2, 1, 0))]);
        let series = Aggregator::new(Attribution::Overlap).aggregate(&store, &january_days());

        assert!((series.bins[0].minutes - 60.0).abs() < f64::EPSILON);
        assert!((series.bins[1].minutes - 60.0).abs() < f64::EPSILON);
        assert!((series.total_minutes() - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_open_interval_excluded() {
        let store = IntervalStore::new(
            "coding",
            vec![
                closed(utc(1, 9, 0), utc(1, 10, 0)),
                Interval::open(utc(1, 11, 0)),
            ],
        );
        for attribution in [Attribution::Containment, Attribution::Overlap] {
            let series = Aggregator::new(attribution).aggregate(&store, &january_days());
            assert!((series.total_minutes() - 60.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_empty_store_yields_zero_for_every_bin() {
        let store = IntervalStore::new("coding", Vec::new());
        let bins = january_days();
        let series = Aggregator::default().aggregate(&store, &bins);

        assert_eq!(series.bins.len(), bins.len());
        assert!(values(&series).iter().all(|&minutes| minutes == 0.0));
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let store = IntervalStore::new(
            "coding",
            vec![
                closed(utc(4, 8, 0), utc(4, 8, 20)),
                closed(utc(9, 14, 0), utc(9, 16, 0)),
            ],
        );
        let bins = january_days();
        let aggregator = Aggregator::default();

        assert_eq!(aggregator.aggregate(&store, &bins), aggregator.aggregate(&store, &bins));
    }
}
