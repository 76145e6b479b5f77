//! meetcue CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use meetcue_cli::cli::{Cli, Command, ConfigAction};
use meetcue_cli::commands;
use meetcue_cli::config::CliConfig;
use meetcue_cli::error::CliResult;
use meetcue_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else if matches!(cli.command, Command::Watch { .. }) {
        TracingConfig::watch()
    } else {
        TracingConfig::default()
    };
    if let Some(format) = cli.log_format {
        tracing_config = tracing_config.with_format(format);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(CliConfig::default_path);
    let config = match cli.config {
        Some(ref path) => CliConfig::load_from(path)?,
        None => CliConfig::load()?,
    };

    match cli.command {
        Command::Watch {
            events,
            page_url,
            poll_interval,
        } => {
            let events = config.events_file(events)?;
            let mut reminders = config.reminders.to_reminder_config();
            if let Some(secs) = poll_interval {
                reminders = reminders.with_poll_interval(Duration::from_secs(secs));
            }
            if let Some(url) = page_url {
                reminders = reminders.with_page_url(url);
            }
            commands::watch::run(events, reminders).await
        }
        Command::List { events, limit } => {
            let events = config.events_file(events)?;
            let limit = limit.unwrap_or(config.display.dashboard_limit);
            commands::list::run(events, limit).await
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
