//! Timewarrior `export` format.
//!
//! `timew export` prints a JSON array of interval objects:
//!
//! ```json
//! [
//!   {"id": 2, "start": "20230101T090000Z", "end": "20230101T100000Z", "tags": ["coding"]},
//!   {"id": 1, "start": "20230101T110000Z", "tags": ["coding"]}
//! ]
//! ```
//!
//! Timestamps are UTC in compact ISO 8601 form. The most recent interval has no `end`
//! while it is still being tracked. Fields other than `id`, `start`, `end` and `tags`
//! (e.g. `annotation`) are ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::StatsError;
use crate::types::Interval;

/// `chrono` format string for Timewarrior's compact UTC timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Deserialize)]
struct ExportedInterval {
    #[serde(default)]
    id: Option<u64>,
    start: String,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parses a compact timestamp such as `20230101T090000Z`.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StatsError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| StatsError::Timestamp {
            value: value.to_string(),
            source,
        })
}

/// Formats an instant the way Timewarrior expects it on the command line.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses the output of `timew export`.
///
/// Blank output is treated as an empty export.
pub fn parse_export(json: &str) -> Result<Vec<Interval>, StatsError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let exported: Vec<ExportedInterval> = serde_json::from_str(json)?;
    exported
        .into_iter()
        .map(|raw| {
            let start = parse_timestamp(&raw.start)?;
            let end = raw.end.as_deref().map(parse_timestamp).transpose()?;
            if let Some(end) = end {
                if end < start {
                    return Err(StatsError::InvertedInterval { start, end });
                }
            }
            Ok(Interval {
                id: raw.id,
                start,
                end,
                tags: raw.tags,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp() {
        let parsed = parse_timestamp("20230101T093015Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 1, 1, 9, 30, 15).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_extended_format() {
        assert!(matches!(
            parse_timestamp("2023-01-01T09:30:15Z"),
            Err(StatsError::Timestamp { .. })
        ));
    }

    #[test]
    fn test_format_timestamp() {
        let instant = Utc.with_ymd_and_hms(2024, 2, 29, 23, 5, 9).unwrap();
        assert_eq!(format_timestamp(instant), "20240229T230509Z");
    }

    #[test]
    fn test_parse_export_with_running_interval() {
        let json = r#"[
            {"id":3,"start":"20230101T090000Z","end":"20230101T100000Z","tags":["coding","rust"]},
            {"id":2,"start":"20230102T090000Z","end":"20230102T093000Z","tags":["coding"],"annotation":"review"},
            {"id":1,"start":"20230103T090000Z","tags":["coding"]}
        ]"#;

        let intervals = parse_export(json).unwrap();

        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[0].id, Some(3));
        assert_eq!(intervals[0].tags, ["coding", "rust"]);
        assert_eq!(
            intervals[1].end,
            Some(Utc.with_ymd_and_hms(2023, 1, 2, 9, 30, 0).unwrap())
        );
        assert!(intervals[2].is_open());
    }

    #[test]
    fn test_parse_export_without_tags() {
        let intervals = parse_export(r#"[{"start":"20230101T090000Z","end":"20230101T091500Z"}]"#)
            .unwrap();
        assert_eq!(intervals.len(), 1);
        assert!(intervals[0].tags.is_empty());
        assert_eq!(intervals[0].id, None);
    }

    #[test]
    fn test_parse_export_blank_and_empty() {
        assert!(parse_export("").unwrap().is_empty());
        assert!(parse_export("  \n").unwrap().is_empty());
        assert!(parse_export("[\n]\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_export_malformed_json() {
        assert!(matches!(
            parse_export("[{\"start\":"),
            Err(StatsError::MalformedExport(_))
        ));
        assert!(matches!(
            parse_export("{\"start\":\"20230101T090000Z\"}"),
            Err(StatsError::MalformedExport(_))
        ));
    }

    #[test]
    fn test_parse_export_rejects_inverted_interval() {
        let json = r#"[{"start":"20230101T100000Z","end":"20230101T090000Z"}]"#;
        assert!(matches!(
            parse_export(json),
            Err(StatsError::InvertedInterval { .. })
        ));
    }
}
