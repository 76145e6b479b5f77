//! The reminder event loop.
//!
//! One task owns the [`ReminderScheduler`] and multiplexes three inputs:
//! the poll interval, events from timer tasks, and user commands arriving
//! through a [`RuntimeHandle`]. Everything that mutates reminder state runs
//! on this task, one event at a time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use meetcue_source::MeetingSource;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::ReminderConfig;
use crate::error::ReminderResult;
use crate::scheduler::{ReconcileReport, ReminderScheduler};
use crate::task::{TimerEvent, Timers};
use crate::view::{Point, ReminderView};

/// Source of the current time for reconcile and countdowns.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Commands that can be sent to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCommand {
    /// Fetch and reconcile right away.
    Refresh,
    /// Ignore a meeting for the rest of the session.
    Ignore { meeting_id: String },
    /// Open the join URL of a shown reminder.
    Join { meeting_id: String },
    /// Hosting page navigated.
    SetPageUrl { url: Option<String> },
    DragStart {
        meeting_id: String,
        pointer: Point,
        origin: Point,
    },
    DragMove { pointer: Point },
    DragEnd,
    /// Stop the loop.
    Stop,
}

/// Drives a [`ReminderScheduler`] from a meeting source.
pub struct ReminderRuntime<V> {
    scheduler: ReminderScheduler<V>,
    source: Arc<dyn MeetingSource>,
    clock: Box<dyn Clock>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    command_tx: mpsc::Sender<ReminderCommand>,
    command_rx: mpsc::Receiver<ReminderCommand>,
}

impl<V: ReminderView> ReminderRuntime<V> {
    /// Creates a runtime polling `source` and rendering into `view`.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::Config`](crate::ReminderError::Config) if
    /// `config` does not validate.
    pub fn new(
        config: ReminderConfig,
        view: V,
        source: Arc<dyn MeetingSource>,
    ) -> ReminderResult<Self> {
        config.validate()?;
        let (timers, timer_rx) = Timers::channel();
        let (command_tx, command_rx) = mpsc::channel(16);

        Ok(Self {
            scheduler: ReminderScheduler::new(config, view, timers),
            source,
            clock: Box::new(SystemClock),
            timer_rx,
            command_tx,
            command_rx,
        })
    }

    /// Builder: use `clock` instead of the system clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Returns a handle for sending commands to the runtime.
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            command_tx: self.command_tx.clone(),
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler<V> {
        &self.scheduler
    }

    /// Fetches meetings and reconciles them.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::SourceUnavailable`] if the fetch failed, in
    /// which case no reminder state was touched.
    ///
    /// [`ReminderError::SourceUnavailable`]: crate::ReminderError::SourceUnavailable
    pub async fn poll_once(&mut self) -> ReminderResult<ReconcileReport> {
        let records = self.source.fetch_upcoming().await?;
        let now = self.clock.now();
        debug!(
            source = self.source.name(),
            count = records.len(),
            "Fetched meetings"
        );
        Ok(self.scheduler.reconcile_records(records, now))
    }

    /// Runs until [`RuntimeHandle::stop`] is called, then hands the
    /// scheduler back.
    ///
    /// The first poll happens immediately.
    pub async fn run(mut self) -> ReminderScheduler<V> {
        let poll_interval = self.scheduler.config().poll_interval;
        info!(
            interval_secs = poll_interval.as_secs(),
            source = self.source.name(),
            "Reminder loop started"
        );

        let mut poll = tokio::time::interval(poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    if let Err(e) = self.poll_once().await {
                        warn!(error = %e, "Skipping reconcile cycle");
                    }
                }
                Some(event) = self.timer_rx.recv() => {
                    let now = self.clock.now();
                    self.scheduler.handle_timer(event, now);
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(ReminderCommand::Stop) | None => {
                            info!("Reminder loop stopping");
                            break;
                        }
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }
            }
        }

        self.scheduler
    }

    async fn handle_command(&mut self, cmd: ReminderCommand) {
        match cmd {
            ReminderCommand::Refresh => {
                debug!("Received Refresh command");
                if let Err(e) = self.poll_once().await {
                    warn!(error = %e, "Refresh failed");
                }
            }
            ReminderCommand::Ignore { meeting_id } => self.scheduler.ignore(&meeting_id),
            ReminderCommand::Join { meeting_id } => {
                if let Err(e) = self.scheduler.join(&meeting_id) {
                    warn!(error = %e, "Cannot join meeting");
                }
            }
            ReminderCommand::SetPageUrl { url } => {
                self.scheduler.set_page_url(url.as_deref());
                if let Err(e) = self.poll_once().await {
                    warn!(error = %e, "Skipping reconcile cycle");
                }
            }
            ReminderCommand::DragStart {
                meeting_id,
                pointer,
                origin,
            } => {
                self.scheduler.drag_start(&meeting_id, pointer, origin);
            }
            ReminderCommand::DragMove { pointer } => {
                self.scheduler.drag_move(pointer);
            }
            ReminderCommand::DragEnd => {
                self.scheduler.drag_end();
            }
            ReminderCommand::Stop => {}
        }
    }
}

/// Handle for sending commands to a running [`ReminderRuntime`].
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<ReminderCommand>,
}

type SendResult = Result<(), mpsc::error::SendError<ReminderCommand>>;

impl RuntimeHandle {
    /// Sends a raw command.
    pub async fn send(&self, cmd: ReminderCommand) -> SendResult {
        self.command_tx.send(cmd).await
    }

    /// Sends a raw command from outside the async runtime.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_send(&self, cmd: ReminderCommand) -> SendResult {
        self.command_tx.blocking_send(cmd)
    }

    /// Fetches and reconciles right away.
    pub async fn refresh(&self) -> SendResult {
        self.send(ReminderCommand::Refresh).await
    }

    /// Ignores a meeting for the rest of the session.
    pub async fn ignore(&self, meeting_id: impl Into<String>) -> SendResult {
        self.send(ReminderCommand::Ignore {
            meeting_id: meeting_id.into(),
        })
        .await
    }

    /// Opens the join URL of a shown reminder.
    pub async fn join(&self, meeting_id: impl Into<String>) -> SendResult {
        self.send(ReminderCommand::Join {
            meeting_id: meeting_id.into(),
        })
        .await
    }

    /// Stops the runtime.
    pub async fn stop(&self) -> SendResult {
        self.send(ReminderCommand::Stop).await
    }
}
