//! Calendar-aligned bin partitioning.
//!
//! Bin boundaries are computed as local dates in the configured timezone and each
//! boundary is converted to UTC on its own, so a bin spanning a DST change is 23 or 25
//! hours long rather than drifting off midnight.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::StatsError;
use crate::types::{Bin, CalendarConfig, Granularity, TimeSpan, WeekStart};

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
pub(crate) fn local_midnight_to_utc(local_date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight: the day starts once the gap ends
            let one_am = midnight + Duration::hours(1);
            tz.from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
        }
    }
}

/// Returns the first local date of the calendar unit containing `date`.
fn align_date(date: NaiveDate, granularity: Granularity, week_start: WeekStart) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            let offset = match week_start {
                WeekStart::Monday => date.weekday().num_days_from_monday(),
                WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            };
            date - Duration::days(i64::from(offset))
        }
        Granularity::Month => date.with_day(1).unwrap_or(date),
        Granularity::Year => date.with_ordinal(1).unwrap_or(date),
    }
}

/// Returns the first local date of the unit after the one starting at `date`.
fn next_unit(date: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Day => date.succ_opt(),
        Granularity::Week => date.checked_add_signed(Duration::weeks(1)),
        Granularity::Month => date.checked_add_months(Months::new(1)),
        Granularity::Year => date.checked_add_months(Months::new(12)),
    }
}

/// Splits `span` into calendar-aligned bins of the given granularity.
///
/// The first bin starts at the unit boundary at or before `span.start()`. Bins are
/// emitted until one ends at or after `span.end()`; that last bin keeps its calendar
/// end and is not clipped to the span.
pub fn partition(
    span: &TimeSpan,
    granularity: Granularity,
    calendar: &CalendarConfig,
) -> Result<Vec<Bin>, StatsError> {
    if span.start() >= span.end() {
        return Err(StatsError::EmptySpan {
            start: span.start(),
            end: span.end(),
        });
    }

    let tz = calendar.timezone;
    let local_start = span.start().with_timezone(&tz).date_naive();
    let mut date = align_date(local_start, granularity, calendar.week_start);
    let mut starts = Vec::new();

    loop {
        let next = next_unit(date, granularity).ok_or(StatsError::OutOfRange)?;
        let start = local_midnight_to_utc(date, tz);
        let end = local_midnight_to_utc(next, tz);
        starts.push((date, TimeSpan::new(start, end)?));
        if end >= span.end() {
            break;
        }
        date = next;
    }

    let labeler = Labeler::new(granularity, &starts);
    let bins: Vec<Bin> = starts
        .into_iter()
        .map(|(date, span)| Bin {
            span,
            label: labeler.label(date),
        })
        .collect();

    tracing::debug!(%granularity, %span, bins = bins.len(), "partitioned span");
    Ok(bins)
}

/// How much context a label needs to stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Qualifier {
    None,
    Month,
    Year,
}

/// Derives bin labels, qualifying them when the bins cross a month or year.
struct Labeler {
    granularity: Granularity,
    qualifier: Qualifier,
}

impl Labeler {
    fn new(granularity: Granularity, starts: &[(NaiveDate, TimeSpan)]) -> Self {
        let (Some((first, _)), Some((last, _))) = (starts.first(), starts.last()) else {
            return Self {
                granularity,
                qualifier: Qualifier::None,
            };
        };

        let qualifier = match granularity {
            Granularity::Day if first.year() != last.year() => Qualifier::Year,
            Granularity::Day if first.month() != last.month() => Qualifier::Month,
            Granularity::Week if first.iso_week().year() != last.iso_week().year() => {
                Qualifier::Year
            }
            Granularity::Month if first.year() != last.year() => Qualifier::Year,
            _ => Qualifier::None,
        };

        Self {
            granularity,
            qualifier,
        }
    }

    fn label(&self, date: NaiveDate) -> String {
        match (self.granularity, self.qualifier) {
            (Granularity::Day, Qualifier::None) => date.day().to_string(),
            (Granularity::Day, Qualifier::Month) => date.format("%b %-d").to_string(),
            (Granularity::Day, Qualifier::Year) => date.format("%Y-%m-%d").to_string(),
            (Granularity::Week, Qualifier::None) => date.iso_week().week().to_string(),
            (Granularity::Week, _) => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            (Granularity::Month, Qualifier::None) => date.month().to_string(),
            (Granularity::Month, _) => date.format("%Y-%m").to_string(),
            (Granularity::Year, _) => date.year().to_string(),
        }
    }
}
