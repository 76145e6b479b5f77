//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/meetcue/config.toml` by default:
//!
//! ```toml
//! [reminders]
//! poll_interval_seconds = 30
//! display_window_minutes = 3
//! approach_window_minutes = 10
//! grace_period_minutes = 5
//!
//! [source]
//! events_file = "~/calendar/events.json"
//!
//! [display]
//! dashboard_limit = 5
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::Duration;
use meetcue_reminder::ReminderConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Configuration for the meetcue CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Reminder timing.
    pub reminders: ReminderSettings,

    /// Where meetings come from.
    pub source: SourceSettings,

    /// Dashboard settings.
    pub display: DisplaySettings,
}

/// Reminder timing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    /// Seconds between two meeting fetches.
    pub poll_interval_seconds: u64,

    /// Meetings starting within this many minutes are shown right away.
    pub display_window_minutes: i64,

    /// Meetings starting within this many minutes get a deferred reminder.
    pub approach_window_minutes: i64,

    /// Minutes a reminder stays up after its meeting started.
    pub grace_period_minutes: i64,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 30,
            display_window_minutes: 3,
            approach_window_minutes: 10,
            grace_period_minutes: 5,
        }
    }
}

impl ReminderSettings {
    /// Converts to the scheduler configuration.
    pub fn to_reminder_config(&self) -> ReminderConfig {
        ReminderConfig::default()
            .with_poll_interval(StdDuration::from_secs(self.poll_interval_seconds))
            .with_windows(
                Duration::minutes(self.display_window_minutes),
                Duration::minutes(self.approach_window_minutes),
            )
            .with_grace_period(Duration::minutes(self.grace_period_minutes))
    }
}

/// Meeting source settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Calendar API events JSON file, re-read on every poll.
    pub events_file: Option<PathBuf>,
}

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Maximum number of meetings `list` shows.
    pub dashboard_limit: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { dashboard_limit: 5 }
    }
}

impl CliConfig {
    /// Loads configuration from the default path, or defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the file exists but cannot be read
    /// or parsed.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetcue")
    }

    /// Events file to read: `flag` if given, else the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if neither is set.
    pub fn events_file(&self, flag: Option<PathBuf>) -> CliResult<PathBuf> {
        flag.or_else(|| self.source.events_file.clone()).ok_or_else(|| {
            CliError::config(format!(
                "no events file. Pass --events <file> or add to {}:\n  \
                 [source]\n  \
                 events_file = \"/path/to/events.json\"",
                Self::default_path().display()
            ))
        })
    }

    /// Checks that the reminder settings make sense together.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> CliResult<()> {
        self.reminders.to_reminder_config().validate()?;
        if self.display.dashboard_limit == 0 {
            return Err(CliError::config("dashboard_limit must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_scheduler_defaults() {
        let config = CliConfig::default();
        assert_eq!(
            config.reminders.to_reminder_config(),
            ReminderConfig::default()
        );
        assert_eq!(config.display.dashboard_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config: CliConfig = toml::from_str(
            r#"
[reminders]
poll_interval_seconds = 60

[source]
events_file = "/tmp/events.json"
"#,
        )
        .unwrap();

        assert_eq!(config.reminders.poll_interval_seconds, 60);
        assert_eq!(config.reminders.display_window_minutes, 3);
        assert_eq!(
            config.source.events_file,
            Some(PathBuf::from("/tmp/events.json"))
        );
        assert_eq!(
            config.reminders.to_reminder_config().poll_interval,
            StdDuration::from_secs(60)
        );
    }

    #[test]
    fn empty_toml_is_default() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ndashboard_limit = 3").unwrap();

        let config = CliConfig::load_from(file.path()).unwrap();
        assert_eq!(config.display.dashboard_limit, 3);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reminders]\npoll_interval_seconds = \"soon\"").unwrap();

        let err = CliConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn dump_round_trips() {
        let mut config = CliConfig::default();
        config.source.events_file = Some(PathBuf::from("/tmp/events.json"));
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<CliConfig>(&text).unwrap(), config);
    }

    #[test]
    fn validate_rejects_inverted_windows() {
        let mut config = CliConfig::default();
        config.reminders.display_window_minutes = 15;
        assert!(matches!(config.validate(), Err(CliError::Reminder(_))));
    }

    #[test]
    fn events_file_prefers_flag() {
        let mut config = CliConfig::default();
        assert!(config.events_file(None).is_err());

        config.source.events_file = Some(PathBuf::from("/from/config.json"));
        assert_eq!(
            config.events_file(Some(PathBuf::from("/from/flag.json"))).unwrap(),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(
            config.events_file(None).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }
}
