//! Meeting types.
//!
//! A calendar source hands over [`MeetingRecord`]s, which may be incomplete.
//! Only records that carry an identifier and a start instant can be turned
//! into a [`Meeting`], the type the reminder scheduler works with.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::links;

/// Title used when a meeting has no summary.
pub const DEFAULT_TITLE: &str = "Next Meeting";

/// Reasons a [`MeetingRecord`] cannot be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeetingError {
    /// The record has no (or an empty) identifier.
    #[error("meeting record has no identifier")]
    MissingId,

    /// The record has no start instant (e.g. an all-day event).
    #[error("meeting {id} has no start time")]
    MissingStart { id: String },
}

/// A place a join URL can come from, in the order it should be tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum JoinSource {
    /// A direct join link, such as a calendar event's hangout link.
    Link(String),
    /// A conference room code such as `abc-defg-hij`.
    ConferenceId(String),
    /// Free-form location text that may contain a join URL.
    Location(String),
}

/// An unvalidated meeting as returned by a calendar source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingRecord {
    /// Provider identifier, stable across polls.
    pub id: Option<String>,
    /// Event summary.
    pub title: Option<String>,
    /// Start instant.
    pub start: Option<DateTime<Utc>>,
    /// End instant.
    pub end: Option<DateTime<Utc>>,
    /// Join URL candidates, highest priority first.
    pub join_sources: Vec<JoinSource>,
}

impl MeetingRecord {
    /// Creates a record with the given identifier and nothing else.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Builder: set title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set start and end.
    pub fn with_times(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Builder: append a join source.
    pub fn with_join_source(mut self, source: JoinSource) -> Self {
        self.join_sources.push(source);
        self
    }
}

/// A meeting that can be scheduled for a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Provider identifier, stable across polls.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// Join URL candidates, highest priority first.
    pub join_sources: Vec<JoinSource>,
}

impl Meeting {
    /// Creates a meeting without join sources.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            join_sources: Vec::new(),
        }
    }

    /// Builder: append a join source.
    pub fn with_join_source(mut self, source: JoinSource) -> Self {
        self.join_sources.push(source);
        self
    }

    /// Time left until the meeting starts; negative once it has started.
    pub fn time_until_start(&self, now: DateTime<Utc>) -> Duration {
        self.start - now
    }

    /// Returns true if the meeting has started at `now`.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start <= now
    }

    /// Returns the first usable join URL.
    ///
    /// See [`links::resolve_join_url`].
    pub fn join_url(&self) -> Option<String> {
        links::resolve_join_url(self)
    }

    /// Returns the canonical room code of the resolved join URL.
    pub fn room_code(&self) -> Option<String> {
        self.join_url()
            .and_then(|url| links::extract_room_code(&url))
    }
}

impl TryFrom<MeetingRecord> for Meeting {
    type Error = MeetingError;

    fn try_from(record: MeetingRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(MeetingError::MissingId)?;

        let start = record
            .start
            .ok_or_else(|| MeetingError::MissingStart { id: id.clone() })?;

        let title = record
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(Self {
            id,
            title,
            start,
            end: record.end.unwrap_or(start),
            join_sources: record.join_sources,
        })
    }
}
