//! Per-reminder countdown driver.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use meetcue_core::{CountdownPhase, CountdownPolicy};

use crate::registry::ReminderInstance;
use crate::task::Timers;
use crate::view::ReminderView;

/// Renders countdowns and keeps one tick task per reminder.
#[derive(Debug, Clone, Copy)]
pub struct CountdownDriver {
    policy: CountdownPolicy,
    interval: StdDuration,
}

impl CountdownDriver {
    pub fn new(policy: CountdownPolicy, interval: StdDuration) -> Self {
        Self { policy, interval }
    }

    /// Renders the countdown now and arms the periodic tick.
    ///
    /// Any tick task the reminder already had is cancelled first.
    pub fn start<V: ReminderView>(
        &self,
        instance: &mut ReminderInstance,
        timers: &mut Timers,
        view: &mut V,
        now: DateTime<Utc>,
    ) -> CountdownPhase {
        instance.cancel_tick();
        instance.tick = Some(timers.schedule_ticks(&instance.meeting.id, self.interval));
        self.render(instance, view, now)
    }

    /// Renders the countdown text for `now`.
    ///
    /// Nothing is rendered once the reminder has expired; the caller is
    /// expected to remove it.
    pub fn render<V: ReminderView>(
        &self,
        instance: &ReminderInstance,
        view: &mut V,
        now: DateTime<Utc>,
    ) -> CountdownPhase {
        let phase = self.policy.phase(instance.meeting.time_until_start(now));
        if let Some(text) = phase.text() {
            view.render_countdown(instance.handle, &text, phase.flags());
        }
        phase
    }
}
