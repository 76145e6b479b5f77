//! `meetcue watch`: run the reminder loop against an events file.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use meetcue_reminder::{ReminderCommand, ReminderConfig, ReminderRuntime, RuntimeHandle};
use meetcue_source::CalendarFileSource;
use tracing::{debug, info, warn};

use crate::error::CliResult;
use crate::terminal::TerminalView;

/// Runs reminders until Ctrl-C or `quit`.
pub async fn run(events: PathBuf, config: ReminderConfig) -> CliResult<()> {
    info!(events = %events.display(), "Watching meetings");
    let source = Arc::new(CalendarFileSource::new(events));
    let runtime = ReminderRuntime::new(config, TerminalView::stdout(), source)?;
    let handle = runtime.handle();

    spawn_command_reader(handle.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Received Ctrl-C");
            request_stop(&handle).await;
        }
    });

    let mut scheduler = runtime.run().await;
    scheduler.clear();
    Ok(())
}

/// Asks the runtime to stop. Returns false if it is already gone.
async fn request_stop(handle: &RuntimeHandle) -> bool {
    match handle.stop().await {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Reminder loop already stopped");
            false
        }
    }
}

/// Forwards stdin lines to the runtime until stdin closes or `quit`.
///
/// Reads on a plain OS thread, outside the tokio runtime.
fn spawn_command_reader(handle: RuntimeHandle) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read command");
                    break;
                }
            };

            let Some(cmd) = parse_command(&line) else {
                if !line.trim().is_empty() {
                    eprintln!("unknown command: {}", line.trim());
                    eprintln!("commands: ignore <id>, join <id>, refresh, page [url], quit");
                }
                continue;
            };

            let stop = cmd == ReminderCommand::Stop;
            if handle.blocking_send(cmd).is_err() || stop {
                break;
            }
        }
    });
}

/// Parses one stdin command line.
pub fn parse_command(line: &str) -> Option<ReminderCommand> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    let arg = parts.next().map(str::to_string);
    if parts.next().is_some() {
        return None;
    }

    match (verb, arg) {
        ("ignore", Some(meeting_id)) => Some(ReminderCommand::Ignore { meeting_id }),
        ("join", Some(meeting_id)) => Some(ReminderCommand::Join { meeting_id }),
        ("page", url) => Some(ReminderCommand::SetPageUrl { url }),
        ("refresh", None) => Some(ReminderCommand::Refresh),
        ("quit" | "exit", None) => Some(ReminderCommand::Stop),
        _ => None,
    }
}
