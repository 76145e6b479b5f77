//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use meetcue_core::LogFormat;

/// meetcue - countdown reminders for your upcoming Meet calls
#[derive(Debug, Parser)]
#[command(name = "meetcue")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MEETCUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log line format: pretty, compact or json
    #[arg(long, global = true, env = "MEETCUE_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show countdown reminders for upcoming meetings until interrupted
    ///
    /// Reads commands from stdin: `ignore <id>`, `join <id>`, `refresh`,
    /// `page <url>`, `quit`.
    Watch {
        /// Calendar API events JSON file (overrides config)
        #[arg(long, short)]
        events: Option<PathBuf>,

        /// URL of the meeting page reminders are shown on
        #[arg(long)]
        page_url: Option<String>,

        /// Seconds between two reads of the events file (overrides config)
        #[arg(long)]
        poll_interval: Option<u64>,
    },

    /// List upcoming meetings with their join links
    List {
        /// Calendar API events JSON file (overrides config)
        #[arg(long, short)]
        events: Option<PathBuf>,

        /// Maximum number of meetings to list (overrides config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
