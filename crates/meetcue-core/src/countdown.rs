//! Countdown math for a single reminder.
//!
//! A reminder counts down to its meeting start, shows a "starting now"
//! indicator once the start has passed, and expires a fixed time later.

use chrono::Duration;

/// Text rendered once the meeting has started.
pub const DUE_TEXT: &str = "Now!";

/// Render flags passed to the view together with the countdown text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownFlags {
    /// Less than the urgent threshold remains.
    pub urgent: bool,
    /// The meeting has started.
    pub due: bool,
}

/// Where a reminder is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// The meeting has not started yet.
    Counting { remaining: Duration, urgent: bool },
    /// The meeting has started and the reminder is still useful.
    Due,
    /// The meeting started long enough ago that the reminder must go.
    Expired,
}

impl CountdownPhase {
    /// Text to render for this phase; `None` once expired.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Counting { remaining, .. } => Some(format_remaining(*remaining)),
            Self::Due => Some(DUE_TEXT.to_string()),
            Self::Expired => None,
        }
    }

    /// Render flags for this phase.
    pub fn flags(&self) -> CountdownFlags {
        match self {
            Self::Counting { urgent, .. } => CountdownFlags {
                urgent: *urgent,
                due: false,
            },
            Self::Due | Self::Expired => CountdownFlags {
                urgent: false,
                due: true,
            },
        }
    }

    /// Returns true if the reminder should be removed.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Thresholds that drive the phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownPolicy {
    /// Below this remaining time the countdown is rendered as urgent.
    pub urgent_threshold: Duration,
    /// How long after the start a reminder stays on screen.
    pub expire_after: Duration,
}

impl Default for CountdownPolicy {
    fn default() -> Self {
        Self {
            urgent_threshold: Duration::seconds(10),
            expire_after: Duration::minutes(5),
        }
    }
}

impl CountdownPolicy {
    /// Classifies the remaining time until start.
    ///
    /// Zero counts as due; expiry is strictly past `expire_after`.
    pub fn phase(&self, remaining: Duration) -> CountdownPhase {
        if remaining > Duration::zero() {
            CountdownPhase::Counting {
                remaining,
                urgent: remaining < self.urgent_threshold,
            }
        } else if remaining < -self.expire_after {
            CountdownPhase::Expired
        } else {
            CountdownPhase::Due
        }
    }
}

/// Formats a remaining duration as `MM:SS`, floored to the second.
///
/// Negative durations render as `00:00`. Minutes are not capped, so an
/// hour renders as `60:00`.
pub fn format_remaining(remaining: Duration) -> String {
    let total_secs = remaining.num_milliseconds().max(0) / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
