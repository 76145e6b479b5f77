//! The [`MeetingSource`] trait and an in-memory implementation.
//!
//! A source answers one question: which meetings are coming up? Polling
//! cadence, authentication and transport are the source's own business.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use meetcue_core::MeetingRecord;

use crate::error::{SourceError, SourceResult};

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Supplies upcoming meetings on demand.
///
/// ```ignore
/// impl MeetingSource for CalendarApiSource {
///     fn name(&self) -> &str { "google" }
///
///     fn fetch_upcoming(&self) -> BoxFuture<'_, SourceResult<Vec<MeetingRecord>>> {
///         Box::pin(async move {
///             let items = self.client.list_events().await?;
///             Ok(normalize_events(&items))
///         })
///     }
/// }
/// ```
pub trait MeetingSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetches the current list of upcoming meetings.
    ///
    /// # Errors
    ///
    /// Any error makes the caller skip the current cycle.
    fn fetch_upcoming(&self) -> BoxFuture<'_, SourceResult<Vec<MeetingRecord>>>;
}

#[derive(Debug)]
enum Answer {
    Meetings(Vec<MeetingRecord>),
    Unavailable(String),
}

/// A source that serves an in-memory list which can be swapped at any time.
#[derive(Debug)]
pub struct StaticSource {
    answer: Mutex<Answer>,
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl StaticSource {
    /// Creates a source serving `meetings`.
    pub fn new(meetings: Vec<MeetingRecord>) -> Self {
        Self {
            answer: Mutex::new(Answer::Meetings(meetings)),
        }
    }

    /// Replaces the served meetings.
    pub fn set_meetings(&self, meetings: Vec<MeetingRecord>) {
        *self.lock() = Answer::Meetings(meetings);
    }

    /// Makes every following fetch fail until meetings are set again.
    pub fn set_unavailable(&self, message: impl Into<String>) {
        *self.lock() = Answer::Unavailable(message.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Answer> {
        // A poisoned lock still holds a consistent answer.
        self.answer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl MeetingSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_upcoming(&self) -> BoxFuture<'_, SourceResult<Vec<MeetingRecord>>> {
        let result = match &*self.lock() {
            Answer::Meetings(meetings) => Ok(meetings.clone()),
            Answer::Unavailable(message) => Err(SourceError::unavailable(message.clone())),
        };
        Box::pin(async move { result })
    }
}
