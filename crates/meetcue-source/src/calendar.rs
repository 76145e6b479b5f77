//! Google Calendar event normalization and a file-backed source.
//!
//! The Calendar API `events.list` response is mapped to [`MeetingRecord`]s.
//! Only events that can be joined on Google Meet are kept: those with a
//! hangout link, a conference id, or a location mentioning Meet.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use meetcue_core::links::MEET_HOST;
use meetcue_core::{JoinSource, MeetingRecord};

use crate::error::{SourceError, SourceResult};
use crate::source::{BoxFuture, MeetingSource};

/// A Calendar API event, reduced to the fields reminders need.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    /// `confirmed`, `tentative` or `cancelled`.
    pub status: Option<String>,
    pub start: Option<CalendarEventTime>,
    pub end: Option<CalendarEventTime>,
    pub hangout_link: Option<String>,
    pub conference_data: Option<ConferenceData>,
    pub location: Option<String>,
}

/// Start or end of a Calendar API event.
///
/// All-day events only carry `date`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarEventTime {
    pub date_time: Option<DateTime<FixedOffset>>,
    pub date: Option<NaiveDate>,
}

impl CalendarEventTime {
    fn instant(&self) -> Option<DateTime<Utc>> {
        self.date_time.map(|dt| dt.with_timezone(&Utc))
    }
}

/// Conference details attached to an event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceData {
    pub conference_id: Option<String>,
}

/// Either a full `events.list` response or a bare array of events.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventsDocument {
    List {
        #[serde(default)]
        items: Vec<CalendarEvent>,
    },
    Bare(Vec<CalendarEvent>),
}

impl CalendarEvent {
    /// Returns true if the event can be joined on Google Meet.
    pub fn is_meet_event(&self) -> bool {
        self.hangout_link.is_some()
            || self
                .conference_data
                .as_ref()
                .is_some_and(|c| c.conference_id.is_some())
            || self
                .location
                .as_deref()
                .is_some_and(|l| l.contains(MEET_HOST))
    }

    fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }
}

/// Converts a Calendar API event into a meeting record.
///
/// Returns `None` for cancelled events and events without a Meet join
/// source. Validation of id and start is left to the scheduler.
pub fn normalize_event(event: &CalendarEvent) -> Option<MeetingRecord> {
    if event.is_cancelled() || !event.is_meet_event() {
        return None;
    }

    let mut join_sources = Vec::new();
    if let Some(ref link) = event.hangout_link {
        join_sources.push(JoinSource::Link(link.clone()));
    }
    if let Some(id) = event
        .conference_data
        .as_ref()
        .and_then(|c| c.conference_id.clone())
    {
        join_sources.push(JoinSource::ConferenceId(id));
    }
    if let Some(ref location) = event.location {
        join_sources.push(JoinSource::Location(location.clone()));
    }

    Some(MeetingRecord {
        id: event.id.clone(),
        title: event.summary.clone(),
        start: event.start.as_ref().and_then(CalendarEventTime::instant),
        end: event.end.as_ref().and_then(CalendarEventTime::instant),
        join_sources,
    })
}

/// Normalizes a batch of events, dropping those that are not Meet events.
pub fn normalize_events(events: &[CalendarEvent]) -> Vec<MeetingRecord> {
    events.iter().filter_map(normalize_event).collect()
}

/// Parses an `events.list` JSON document (or a bare event array).
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the JSON is not an events document.
pub fn parse_events(json: &str) -> SourceResult<Vec<MeetingRecord>> {
    let events = match serde_json::from_str::<EventsDocument>(json)? {
        EventsDocument::List { items } => items,
        EventsDocument::Bare(events) => events,
    };
    Ok(normalize_events(&events))
}

/// A source that re-reads a Calendar API JSON dump on every fetch.
#[derive(Debug, Clone)]
pub struct CalendarFileSource {
    path: PathBuf,
}

impl CalendarFileSource {
    /// Creates a source backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MeetingSource for CalendarFileSource {
    fn name(&self) -> &str {
        "calendar-file"
    }

    fn fetch_upcoming(&self) -> BoxFuture<'_, SourceResult<Vec<MeetingRecord>>> {
        Box::pin(async move {
            let content = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| SourceError::io(&self.path, e))?;
            let records = parse_events(&content)?;
            debug!(
                path = %self.path.display(),
                count = records.len(),
                "Loaded meetings from file"
            );
            Ok(records)
        })
    }
}
