//! Scheduler configuration.

use std::time::Duration as StdDuration;

use chrono::Duration;
use meetcue_core::CountdownPolicy;

use crate::error::{ReminderError, ReminderResult};
use crate::registry::CascadeLayout;

/// Timing and layout settings for the reminder scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderConfig {
    /// Time between two meeting-source fetches.
    pub poll_interval: StdDuration,
    /// Time between two countdown renders.
    pub tick_interval: StdDuration,
    /// Meetings starting within this window get a reminder right away.
    pub display_window: Duration,
    /// Meetings starting within this window (but outside the display
    /// window) get a deferred promotion timer.
    pub approach_window: Duration,
    /// How long after its start a reminder stays on screen.
    pub grace_period: Duration,
    /// Below this remaining time the countdown renders as urgent.
    pub urgent_threshold: Duration,
    /// Where default-positioned reminders go.
    pub layout: CascadeLayout,
    /// URL of the page the reminders are shown on, if it is a meeting page.
    pub page_url: Option<String>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            poll_interval: StdDuration::from_secs(30),
            tick_interval: StdDuration::from_secs(1),
            display_window: Duration::minutes(3),
            approach_window: Duration::minutes(10),
            grace_period: Duration::minutes(5),
            urgent_threshold: Duration::seconds(10),
            layout: CascadeLayout::default(),
            page_url: None,
        }
    }
}

impl ReminderConfig {
    /// Builder: set the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: StdDuration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder: set the display and approach windows.
    #[must_use]
    pub fn with_windows(mut self, display: Duration, approach: Duration) -> Self {
        self.display_window = display;
        self.approach_window = approach;
        self
    }

    /// Builder: set the grace period.
    #[must_use]
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    /// Builder: set the cascade layout.
    #[must_use]
    pub fn with_layout(mut self, layout: CascadeLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builder: set the URL of the hosting page.
    #[must_use]
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    /// Countdown thresholds derived from this config.
    pub fn countdown_policy(&self) -> CountdownPolicy {
        CountdownPolicy {
            urgent_threshold: self.urgent_threshold,
            expire_after: self.grace_period,
        }
    }

    /// Checks that the windows and intervals make sense together.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::Config`] describing the first problem found.
    pub fn validate(&self) -> ReminderResult<()> {
        if self.poll_interval.is_zero() {
            return Err(ReminderError::config("poll interval must be positive"));
        }
        if self.tick_interval.is_zero() {
            return Err(ReminderError::config("tick interval must be positive"));
        }
        if self.display_window <= Duration::zero() {
            return Err(ReminderError::config("display window must be positive"));
        }
        if self.approach_window < self.display_window {
            return Err(ReminderError::config(
                "approach window must not be shorter than the display window",
            ));
        }
        if self.grace_period < Duration::zero() {
            return Err(ReminderError::config("grace period must not be negative"));
        }
        Ok(())
    }
}
