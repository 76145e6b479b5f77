//! CLI, terminal reminders, configuration
//!
//! This crate provides the `meetcue` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod terminal;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use terminal::TerminalView;
