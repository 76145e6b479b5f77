//! Core types: meetings, join links, countdowns, dashboard formatting

pub mod countdown;
pub mod dashboard;
pub mod links;
pub mod meeting;
pub mod tracing;

pub use countdown::{CountdownFlags, CountdownPhase, CountdownPolicy, DUE_TEXT, format_remaining};
pub use dashboard::{DashboardEntry, DashboardFormatter, render_dashboard};
pub use links::{extract_room_code, resolve_join_url, resolve_source};
pub use meeting::{DEFAULT_TITLE, JoinSource, Meeting, MeetingError, MeetingRecord};
pub use tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
