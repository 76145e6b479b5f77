//! `meetcue list`: the upcoming-meetings dashboard.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone, Utc};
use meetcue_core::{DashboardFormatter, Meeting, MeetingRecord, render_dashboard};
use meetcue_source::{CalendarFileSource, MeetingSource};
use tracing::warn;

use crate::error::CliResult;

/// Prints the next `limit` meetings from `events`.
pub async fn run(events: PathBuf, limit: usize) -> CliResult<()> {
    let source = CalendarFileSource::new(events);
    let records = source.fetch_upcoming().await?;
    println!("{}", dashboard_text(records, limit, Utc::now(), &Local));
    Ok(())
}

/// Renders the dashboard for `records`, skipping malformed ones.
pub fn dashboard_text<Tz: TimeZone>(
    records: Vec<MeetingRecord>,
    limit: usize,
    now: DateTime<Utc>,
    tz: &Tz,
) -> String
where
    Tz::Offset: fmt::Display,
{
    let meetings: Vec<Meeting> = records
        .into_iter()
        .filter_map(|record| {
            Meeting::try_from(record)
                .inspect_err(|e| warn!(error = %e, "Skipping meeting"))
                .ok()
        })
        .collect();

    let entries = DashboardFormatter::new(limit).format_in(&meetings, now, tz);
    render_dashboard(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use meetcue_core::JoinSource;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 5, h, m, 0).unwrap()
    }

    #[test]
    fn lists_valid_meetings_in_order() {
        let records = vec![
            MeetingRecord::new("late")
                .with_title("Retro")
                .with_times(at(15, 0), at(16, 0)),
            MeetingRecord::new("broken"),
            MeetingRecord::new("early")
                .with_title("Standup")
                .with_times(at(9, 30), at(9, 45))
                .with_join_source(JoinSource::ConferenceId("abc-defg-hij".into())),
        ];

        let text = dashboard_text(records, 5, at(9, 0), &Utc);
        assert_eq!(
            text,
            "Standup\n  Today, 9:30 AM - 9:45 AM\n  join: https://meet.google.com/abc-defg-hij\n\
             Retro\n  Today, 3:00 PM - 4:00 PM\n  join: unavailable"
        );
    }

    #[test]
    fn respects_limit_and_skips_ended() {
        let records = (0..4)
            .map(|i| {
                let start = at(10, 0) + Duration::hours(i);
                MeetingRecord::new(format!("m{i}")).with_times(start, start + Duration::minutes(30))
            })
            .collect();

        let text = dashboard_text(records, 2, at(10, 45), &Utc);
        assert_eq!(text.matches("Next Meeting").count(), 2);
        assert!(text.contains("11:00 AM"));
        assert!(!text.contains("10:00 AM"));
    }

    #[test]
    fn empty_dashboard() {
        assert_eq!(
            dashboard_text(Vec::new(), 5, at(9, 0), &Utc),
            "No upcoming meetings"
        );
    }
}
