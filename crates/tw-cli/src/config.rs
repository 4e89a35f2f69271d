//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tw_core::{Attribution, CalendarConfig, WeekStart};

/// What to do when exporting one tag fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Fail the whole report.
    #[default]
    Abort,
    /// Warn and leave the tag out of the report.
    Skip,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timewarrior executable.
    pub timew_binary: PathBuf,

    /// First day of week bins.
    pub week_start: WeekStart,

    /// IANA timezone for bin boundaries. Defaults to the system timezone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    pub on_fetch_failure: FetchFailurePolicy,

    pub attribution: Attribution,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timew_binary: PathBuf::from("timew"),
            week_start: WeekStart::default(),
            timezone: None,
            on_fetch_failure: FetchFailurePolicy::default(),
            attribution: Attribution::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TWTOOLS_*)
        figment = figment.merge(Env::prefixed("TWTOOLS_"));

        figment.extract()
    }

    /// Resolves the bin timezone: configured name, then system zone, then UTC.
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        if let Some(name) = &self.timezone {
            return name
                .parse::<Tz>()
                .map_err(|err| anyhow::anyhow!("{err}"))
                .with_context(|| format!("invalid timezone in configuration: {name}"));
        }

        match iana_time_zone::get_timezone().map(|name| name.parse::<Tz>()) {
            Ok(Ok(tz)) => Ok(tz),
            _ => {
                tracing::warn!("could not detect system timezone, using UTC");
                Ok(chrono_tz::UTC)
            }
        }
    }

    /// Calendar settings for hint parsing and bin partitioning.
    pub fn calendar(&self) -> anyhow::Result<CalendarConfig> {
        Ok(CalendarConfig {
            week_start: self.week_start,
            timezone: self.timezone()?,
        })
    }
}

/// Returns the platform-specific config directory for twtools.
///
/// On Linux: `~/.config/twtools`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("twtools"))
}
