//! A [`ReminderView`] that records every call, for tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, TimeZone, Utc};
use meetcue_core::{CountdownFlags, JoinSource, Meeting};

use crate::view::{Placement, ReminderView, ViewHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Render {
        meeting_id: String,
        handle: ViewHandle,
        placement: Placement,
    },
    Title {
        handle: ViewHandle,
        title: String,
    },
    Move {
        handle: ViewHandle,
        placement: Placement,
    },
    Countdown {
        handle: ViewHandle,
        text: String,
        flags: CountdownFlags,
    },
    Destroy {
        handle: ViewHandle,
    },
    Open {
        url: String,
    },
}

#[derive(Debug, Clone)]
pub struct Shown {
    pub meeting_id: String,
    pub title: String,
    pub placement: Placement,
    pub countdown: Option<(String, CountdownFlags)>,
}

#[derive(Debug, Default)]
struct Recorded {
    next_handle: u64,
    calls: Vec<ViewCall>,
    shown: BTreeMap<ViewHandle, Shown>,
}

/// Cloning shares the recording, so a test can keep one clone while the
/// scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingView {
    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<ViewCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Meeting ids currently on screen, in handle order.
    pub fn shown_ids(&self) -> Vec<String> {
        self.lock()
            .shown
            .values()
            .map(|s| s.meeting_id.clone())
            .collect()
    }

    pub fn shown(&self, meeting_id: &str) -> Option<Shown> {
        self.lock()
            .shown
            .values()
            .find(|s| s.meeting_id == meeting_id)
            .cloned()
    }

    pub fn render_count(&self, meeting_id: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ViewCall::Render { meeting_id: id, .. } if id == meeting_id))
            .count()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ViewCall::Open { url } => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ReminderView for RecordingView {
    fn render_instance(&mut self, meeting: &Meeting, placement: Placement) -> ViewHandle {
        let mut rec = self.lock();
        rec.next_handle += 1;
        let handle = ViewHandle(rec.next_handle);
        rec.calls.push(ViewCall::Render {
            meeting_id: meeting.id.clone(),
            handle,
            placement,
        });
        rec.shown.insert(
            handle,
            Shown {
                meeting_id: meeting.id.clone(),
                title: meeting.title.clone(),
                placement,
                countdown: None,
            },
        );
        handle
    }

    fn update_instance_title(&mut self, handle: ViewHandle, title: &str) {
        let mut rec = self.lock();
        rec.calls.push(ViewCall::Title {
            handle,
            title: title.to_string(),
        });
        if let Some(shown) = rec.shown.get_mut(&handle) {
            shown.title = title.to_string();
        }
    }

    fn move_instance(&mut self, handle: ViewHandle, placement: Placement) {
        let mut rec = self.lock();
        rec.calls.push(ViewCall::Move { handle, placement });
        if let Some(shown) = rec.shown.get_mut(&handle) {
            shown.placement = placement;
        }
    }

    fn render_countdown(&mut self, handle: ViewHandle, text: &str, flags: CountdownFlags) {
        let mut rec = self.lock();
        rec.calls.push(ViewCall::Countdown {
            handle,
            text: text.to_string(),
            flags,
        });
        if let Some(shown) = rec.shown.get_mut(&handle) {
            shown.countdown = Some((text.to_string(), flags));
        }
    }

    fn destroy_instance(&mut self, handle: ViewHandle) {
        let mut rec = self.lock();
        rec.calls.push(ViewCall::Destroy { handle });
        rec.shown.remove(&handle);
    }

    fn open_url(&mut self, url: &str) {
        self.lock().calls.push(ViewCall::Open {
            url: url.to_string(),
        });
    }
}

pub fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 5, h, m, s).unwrap()
}

/// A 30-minute meeting with a Meet link derived from its id.
pub fn meeting(id: &str, start: DateTime<Utc>) -> Meeting {
    Meeting::new(id, format!("Meeting {id}"), start, start + Duration::minutes(30))
        .with_join_source(JoinSource::ConferenceId(room_code_for(id)))
}

/// A valid room code unique enough per test id.
pub fn room_code_for(id: &str) -> String {
    let letter = id
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map_or('x', |c| c.to_ascii_lowercase());
    format!("{l}{l}{l}-{l}{l}{l}{l}-{l}{l}{l}", l = letter)
}
