//! Cancellable timer tasks.
//!
//! Timers run as small tokio tasks that sleep and then post a
//! [`TimerEvent`] back to the event loop. They never touch scheduler state
//! directly. Every event carries the [`TaskId`] of the task that produced
//! it, so an event that was already in flight when its task got cancelled
//! can be recognized and dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Identifies one spawned timer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Events posted by timer tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A deferred meeting reached its display window.
    Promote { meeting_id: String, task: TaskId },
    /// A countdown tick for a shown reminder.
    Tick { meeting_id: String, task: TaskId },
}

impl TimerEvent {
    /// The task that posted this event.
    pub fn task(&self) -> TaskId {
        match self {
            Self::Promote { task, .. } | Self::Tick { task, .. } => *task,
        }
    }
}

/// Owns a running timer task. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    abort: AbortHandle,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Aborts the task. Events it already posted are stale from now on.
    pub fn cancel(self) {
        self.abort.abort();
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Spawns timer tasks that report to one event channel.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Timers {
    tx: mpsc::UnboundedSender<TimerEvent>,
    next_id: u64,
}

impl Timers {
    /// Creates a spawner and the receiving end of its event channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, next_id: 0 }, rx)
    }

    fn next_task_id(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    /// Posts a [`TimerEvent::Promote`] for `meeting_id` once `delay` elapses.
    pub fn schedule_promotion(&mut self, meeting_id: &str, delay: Duration) -> TaskHandle {
        let id = self.next_task_id();
        let tx = self.tx.clone();
        let event = TimerEvent::Promote {
            meeting_id: meeting_id.to_string(),
            task: id,
        };

        let deadline = Instant::now() + delay;
        let join = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(event);
        });

        TaskHandle {
            id,
            abort: join.abort_handle(),
        }
    }

    /// Posts a [`TimerEvent::Tick`] for `meeting_id` every `period`,
    /// starting one period from now.
    pub fn schedule_ticks(&mut self, meeting_id: &str, period: Duration) -> TaskHandle {
        let id = self.next_task_id();
        let tx = self.tx.clone();
        let meeting_id = meeting_id.to_string();

        let first = Instant::now() + period;
        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let event = TimerEvent::Tick {
                    meeting_id: meeting_id.clone(),
                    task: id,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        TaskHandle {
            id,
            abort: join.abort_handle(),
        }
    }
}
