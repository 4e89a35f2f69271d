//! Active tracking status, as printed by `timew` without arguments.
//!
//! ```text
//! Tracking coding "code review"
//!   Started 2023-01-01T09:00:00
//!   Current                  10:15:30
//!   Total                     1:15:30
//! ```

/// What is currently being tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingStatus {
    /// Tags as printed by Timewarrior, quoting preserved.
    pub tags: String,
    /// Elapsed time of the open interval (`H:MM:SS`).
    pub total: String,
}

/// Parses `timew` status output; `None` when nothing is being tracked.
pub fn parse_tracking_status(output: &str) -> Option<TrackingStatus> {
    let mut lines = output.lines().map(str::trim);
    let tags = lines
        .find(|line| !line.is_empty())?
        .strip_prefix("Tracking")?
        .trim()
        .to_string();
    let total = lines
        .filter_map(|line| line.strip_prefix("Total"))
        .map(str::trim)
        .next()
        .unwrap_or_default()
        .to_string();
    Some(TrackingStatus { tags, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_active_tracking() {
        let output = "\nTracking coding \"code review\"\n  Started 2023-01-01T09:00:00\n  Current                  10:15:30\n  Total                     1:15:30\n";
        let status = parse_tracking_status(output).unwrap();
        assert_eq!(status.tags, "coding \"code review\"");
        assert_eq!(status.total, "1:15:30");
    }

    #[test]
    fn test_parse_untagged_tracking() {
        let status = parse_tracking_status("Tracking\n  Started 2023-01-01T09:00:00\n  Total 0:00:05\n")
            .unwrap();
        assert_eq!(status.tags, "");
        assert_eq!(status.total, "0:00:05");
    }

    #[test]
    fn test_parse_idle() {
        assert_eq!(
            parse_tracking_status("There is no active time tracking.\n"),
            None
        );
        assert_eq!(parse_tracking_status(""), None);
    }
}
