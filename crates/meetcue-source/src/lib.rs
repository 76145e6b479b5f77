//! Meeting sources for the reminder scheduler.
//!
//! - [`MeetingSource`] - the trait every calendar backend implements
//! - [`normalize_event`] - Calendar API event to [`MeetingRecord`]
//! - [`CalendarFileSource`] - re-reads a Calendar API JSON dump per fetch
//! - [`StaticSource`] - in-memory list, swappable at runtime
//!
//! ```text
//!  Calendar API JSON ──► CalendarEvent ──normalize_event()──► MeetingRecord
//!                                                                  │
//!                                          MeetingSource::fetch_upcoming()
//!                                                                  ▼
//!                                                         reminder scheduler
//! ```
//!
//! [`MeetingRecord`]: meetcue_core::MeetingRecord

pub mod calendar;
pub mod error;
pub mod source;

pub use calendar::{
    CalendarEvent, CalendarEventTime, CalendarFileSource, ConferenceData, normalize_event,
    normalize_events, parse_events,
};
pub use error::{SourceError, SourceResult};
pub use source::{BoxFuture, MeetingSource, StaticSource};
