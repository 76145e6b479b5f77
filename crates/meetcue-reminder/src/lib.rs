//! Meeting reminders with countdowns.
//!
//! - [`ReminderScheduler`] - reconcile, deferred promotion, ignore, join
//! - [`ReminderRegistry`] - shown reminders, cascade layout, dragging
//! - [`CountdownDriver`] - per-reminder countdown ticks
//! - [`ReminderRuntime`] - the event loop tying a source to a scheduler
//! - [`ReminderView`] - the rendering surface the scheduler drives
//!
//! ```text
//!  MeetingSource ──poll──► ReminderRuntime ──► ReminderScheduler ──► ReminderView
//!                                ▲                   │
//!                                └──── TimerEvent ◄──┘ (promotion, ticks)
//! ```

pub mod config;
pub mod countdown;
pub mod error;
pub mod ignore;
pub mod registry;
pub mod runtime;
pub mod scheduler;
pub mod task;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ReminderConfig;
pub use countdown::CountdownDriver;
pub use error::{ReminderError, ReminderResult};
pub use ignore::IgnoreSet;
pub use registry::{CascadeLayout, ReminderInstance, ReminderRegistry};
pub use runtime::{Clock, ReminderCommand, ReminderRuntime, RuntimeHandle, SystemClock};
pub use scheduler::{Eviction, ReconcileReport, ReminderScheduler};
pub use task::{TaskHandle, TaskId, TimerEvent, Timers};
pub use view::{Corner, Placement, Point, ReminderView, ViewHandle};
