//! Error types for the reminder scheduler.

use meetcue_core::MeetingError;
use meetcue_source::SourceError;
use thiserror::Error;

/// Result type for reminder operations.
pub type ReminderResult<T> = Result<T, ReminderError>;

/// Errors surfaced by the scheduler.
///
/// None of these are fatal: a failed fetch skips one cycle, a malformed
/// meeting is dropped from its batch, and a failed join is a no-op.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// The meeting source failed; the reconcile cycle is skipped.
    #[error("meeting source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// A meeting record could not be turned into a meeting.
    #[error("malformed meeting: {0}")]
    MalformedMeeting(#[from] MeetingError),

    /// No join source of the meeting resolved to a URL.
    #[error("meeting {meeting_id} has no join URL")]
    NoJoinUrl { meeting_id: String },

    /// No reminder instance is shown for the meeting.
    #[error("no reminder is shown for meeting {meeting_id}")]
    UnknownReminder { meeting_id: String },

    /// Invalid scheduler configuration.
    #[error("invalid reminder configuration: {message}")]
    Config { message: String },
}

impl ReminderError {
    /// Creates a no-join-URL error.
    pub fn no_join_url(meeting_id: impl Into<String>) -> Self {
        Self::NoJoinUrl {
            meeting_id: meeting_id.into(),
        }
    }

    /// Creates an unknown-reminder error.
    pub fn unknown_reminder(meeting_id: impl Into<String>) -> Self {
        Self::UnknownReminder {
            meeting_id: meeting_id.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ReminderError::no_join_url("m1").to_string(),
            "meeting m1 has no join URL"
        );
        assert_eq!(
            ReminderError::from(MeetingError::MissingId).to_string(),
            format!("malformed meeting: {}", MeetingError::MissingId)
        );
        assert_eq!(
            ReminderError::from(SourceError::unavailable("offline")).to_string(),
            "meeting source unavailable: source unavailable: offline"
        );
    }
}
