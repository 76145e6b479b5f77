//! Upcoming-meetings dashboard formatting.
//!
//! Produces the short list shown by `meetcue list`: the next few meetings
//! sorted by start, with a human time range and their join URL.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::meeting::Meeting;

const DEFAULT_LIMIT: usize = 5;
const UNTITLED: &str = "Untitled meeting";

/// One formatted dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardEntry {
    /// Meeting identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Time range, e.g. `Today, 9:05 AM - 9:30 AM`.
    pub when: String,
    /// Resolved join URL, if any.
    pub join_url: Option<String>,
}

impl fmt::Display for DashboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {}", self.when)?;
        match self.join_url {
            Some(ref url) => write!(f, "  join: {url}"),
            None => write!(f, "  join: unavailable"),
        }
    }
}

/// Formats meetings for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardFormatter {
    limit: usize,
}

impl Default for DashboardFormatter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl DashboardFormatter {
    /// Creates a formatter showing at most `limit` meetings.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Formats meetings in the local timezone.
    pub fn format(&self, meetings: &[Meeting], now: DateTime<Utc>) -> Vec<DashboardEntry> {
        self.format_in(meetings, now, &Local)
    }

    /// Formats meetings in the given timezone.
    ///
    /// Meetings that already ended are skipped.
    pub fn format_in<Tz: TimeZone>(
        &self,
        meetings: &[Meeting],
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Vec<DashboardEntry>
    where
        Tz::Offset: fmt::Display,
    {
        let mut upcoming: Vec<&Meeting> = meetings.iter().filter(|m| m.end >= now).collect();
        upcoming.sort_by_key(|m| m.start);

        let today = now.with_timezone(tz).date_naive();

        upcoming
            .into_iter()
            .take(self.limit)
            .map(|meeting| {
                let start = meeting.start.with_timezone(tz);
                let end = meeting.end.with_timezone(tz);
                let range = format!("{} - {}", start.format("%-I:%M %p"), end.format("%-I:%M %p"));
                let when = if start.date_naive() == today {
                    format!("Today, {range}")
                } else {
                    format!("{}, {range}", start.format("%a, %b %-d"))
                };

                let title = if meeting.title.trim().is_empty() {
                    UNTITLED.to_string()
                } else {
                    meeting.title.clone()
                };

                DashboardEntry {
                    id: meeting.id.clone(),
                    title,
                    when,
                    join_url: meeting.join_url(),
                }
            })
            .collect()
    }
}

/// Renders dashboard entries as plain text.
pub fn render_dashboard(entries: &[DashboardEntry]) -> String {
    if entries.is_empty() {
        return "No upcoming meetings".to_string();
    }
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::JoinSource;
    use chrono::Duration;

    fn utc(d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, d, h, min, 0).unwrap()
    }

    fn meeting(id: &str, title: &str, start: DateTime<Utc>, minutes: i64) -> Meeting {
        Meeting::new(id, title, start, start + Duration::minutes(minutes))
    }

    #[test]
    fn renders_today_and_later() {
        let now = utc(3, 9, 0);
        let meetings = vec![
            meeting("planning", "Planning", utc(4, 14, 0), 60),
            meeting("standup", "Standup", utc(3, 9, 5), 25)
                .with_join_source(JoinSource::ConferenceId("abc-defg-hij".into())),
            meeting("done", "Finished", utc(3, 8, 0), 30),
        ];

        let entries = DashboardFormatter::default().format_in(&meetings, now, &Utc);
        insta::assert_snapshot!(render_dashboard(&entries), @r"
        Standup
          Today, 9:05 AM - 9:30 AM
          join: https://meet.google.com/abc-defg-hij
        Planning
          Tue, Feb 4, 2:00 PM - 3:00 PM
          join: unavailable
        ");
    }

    #[test]
    fn limits_entries() {
        let now = utc(3, 9, 0);
        let meetings: Vec<Meeting> = (0..7)
            .map(|i| meeting(&format!("m{i}"), "M", now + Duration::hours(i), 30))
            .collect();

        let entries = DashboardFormatter::default().format_in(&meetings, now, &Utc);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].id, "m0");

        let entries = DashboardFormatter::new(2).format_in(&meetings, now, &Utc);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn ongoing_meeting_is_listed() {
        let now = utc(3, 9, 10);
        let meetings = vec![meeting("live", "Live", utc(3, 9, 0), 30)];
        let entries = DashboardFormatter::default().format_in(&meetings, now, &Utc);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn blank_title_is_untitled() {
        let now = utc(3, 9, 0);
        let meetings = vec![meeting("x", " ", utc(3, 10, 0), 30)];
        let entries = DashboardFormatter::default().format_in(&meetings, now, &Utc);
        assert_eq!(entries[0].title, "Untitled meeting");
    }

    #[test]
    fn empty_dashboard() {
        assert_eq!(render_dashboard(&[]), "No upcoming meetings");
    }
}
