//! Current command: what Timewarrior is tracking right now.

use anyhow::Result;
use tw_core::TrackingStatus;

use crate::config::Config;
use crate::timew::Timew;

/// One line for shell prompts and status bars: tags, then elapsed time.
pub fn format_status(status: &TrackingStatus) -> String {
    format!("{} {}", status.tags, status.total)
}

pub fn run(config: &Config) -> Result<()> {
    let timew = Timew::new(config.timew_binary.clone());

    match timew.status()? {
        Some(status) => println!("{}", format_status(&status)),
        None => println!("Not tracking."),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status() {
        let status = TrackingStatus {
            tags: "coding \"client x\"".to_string(),
            total: "1:02:03".to_string(),
        };
        assert_eq!(format_status(&status), "coding \"client x\" 1:02:03");
    }
}
