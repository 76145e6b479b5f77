//! Log output for the meetcue binaries.
//!
//! Every meetcue crate logs under a `meetcue_*` target, so one `meetcue=<level>`
//! directive covers the whole workspace. `RUST_LOG` replaces that directive
//! when set.
//!
//! ```ignore
//! use meetcue_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::watch()).expect("failed to initialize tracing");
//! ```

use std::fmt as stdfmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

const TARGET_PREFIX: &str = "meetcue";

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("tracing is already initialized: {0}")]
    AlreadyInitialized(#[from] SetGlobalDefaultError),

    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
}

/// How log lines are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    /// One JSON object per line, for piping into other tools.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{other}' (expected pretty, compact or json)"
            )),
        }
    }
}

impl stdfmt::Display for LogFormat {
    fn fmt(&self, f: &mut stdfmt::Formatter<'_>) -> stdfmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Settings for [`init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for meetcue targets when no filter is given.
    pub level: Level,
    pub format: LogFormat,
    /// Print source file and line.
    pub location: bool,
    pub timestamps: bool,
    /// Explicit filter directive; wins over `RUST_LOG` and `level`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    /// Warnings only, no timestamps: one-shot commands like `list`.
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            location: false,
            timestamps: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// `--debug`: everything meetcue logs, with source locations.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            location: true,
            ..Self::default()
        }
    }

    /// `watch`: reminder lifecycle at info, timestamped.
    #[must_use]
    pub fn watch() -> Self {
        Self {
            level: Level::INFO,
            timestamps: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The directive used when neither `filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("{TARGET_PREFIX}={}", self.level.as_str().to_ascii_lowercase())
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match self.filter {
            Some(ref directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_file(self.location)
            .with_line_number(self.location);

        match (self.format, self.timestamps) {
            (LogFormat::Pretty, true) => layer.pretty().boxed(),
            (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => layer.compact().boxed(),
            (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
            (LogFormat::Json, _) => layer.json().boxed(),
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Fails if a subscriber is already installed or the explicit filter does
/// not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let subscriber = Registry::default()
        .with(config.fmt_layer())
        .with(config.env_filter()?);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
