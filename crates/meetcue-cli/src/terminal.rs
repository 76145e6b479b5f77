//! A [`ReminderView`] that prints reminders as terminal lines.
//!
//! A terminal cannot float boxes in a corner, so placements are only
//! reported, and the countdown is printed when it crosses a minute or its
//! urgency changes rather than every second.

use std::collections::HashMap;
use std::io::{self, Write};

use meetcue_core::{CountdownFlags, Meeting};
use meetcue_reminder::{Placement, ReminderView, ViewHandle};
use tracing::warn;

type Opener = Box<dyn FnMut(&str) -> io::Result<()> + Send>;

struct Shown {
    meeting_id: String,
    title: String,
    flags: Option<CountdownFlags>,
}

/// Prints reminder activity to a writer.
pub struct TerminalView<W> {
    out: W,
    opener: Opener,
    next_handle: u64,
    shown: HashMap<ViewHandle, Shown>,
}

impl TerminalView<io::Stdout> {
    /// A view printing to stdout and opening URLs in the default browser.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            opener: Box::new(|url: &str| open::that(url)),
            next_handle: 0,
            shown: HashMap::new(),
        }
    }

    /// Builder: open join URLs with `opener` instead of the browser.
    #[must_use]
    pub fn with_opener(
        mut self,
        opener: impl FnMut(&str) -> io::Result<()> + Send + 'static,
    ) -> Self {
        self.opener = Box::new(opener);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write reminder line");
        }
    }
}

fn describe(placement: Placement) -> String {
    match placement {
        Placement::Anchored {
            horizontal,
            vertical,
            ..
        } => format!("slot {}/{}", horizontal, vertical),
        Placement::Manual { left, top } => format!("at {},{}", left, top),
    }
}

impl<W: Write> ReminderView for TerminalView<W> {
    fn render_instance(&mut self, meeting: &Meeting, placement: Placement) -> ViewHandle {
        self.next_handle += 1;
        let handle = ViewHandle(self.next_handle);
        self.shown.insert(
            handle,
            Shown {
                meeting_id: meeting.id.clone(),
                title: meeting.title.clone(),
                flags: None,
            },
        );
        self.line(format_args!(
            "[{}] {} ({})",
            meeting.id,
            meeting.title,
            describe(placement)
        ));
        handle
    }

    fn update_instance_title(&mut self, handle: ViewHandle, title: &str) {
        let Some(shown) = self.shown.get_mut(&handle) else {
            return;
        };
        shown.title = title.to_string();
        let id = shown.meeting_id.clone();
        self.line(format_args!("[{}] renamed to {}", id, title));
    }

    fn move_instance(&mut self, handle: ViewHandle, placement: Placement) {
        if let Some(id) = self.shown.get(&handle).map(|s| s.meeting_id.clone()) {
            self.line(format_args!("[{}] moved to {}", id, describe(placement)));
        }
    }

    fn render_countdown(&mut self, handle: ViewHandle, text: &str, flags: CountdownFlags) {
        let Some(shown) = self.shown.get_mut(&handle) else {
            return;
        };
        let changed = shown.flags != Some(flags);
        shown.flags = Some(flags);
        if !changed && !text.ends_with(":00") {
            return;
        }

        let (id, title) = (shown.meeting_id.clone(), shown.title.clone());
        let marker = if flags.due {
            " (started)"
        } else if flags.urgent {
            " !"
        } else {
            ""
        };
        self.line(format_args!("[{}] {} {}{}", id, title, text, marker));
    }

    fn destroy_instance(&mut self, handle: ViewHandle) {
        if let Some(shown) = self.shown.remove(&handle) {
            self.line(format_args!("[{}] dismissed", shown.meeting_id));
        }
    }

    fn open_url(&mut self, url: &str) {
        self.line(format_args!("opening {}", url));
        if let Err(e) = (self.opener)(url) {
            warn!(url = %url, error = %e, "Failed to open join URL");
        }
    }
}
