//! The rendering surface the scheduler drives.
//!
//! The scheduler never draws anything itself. It tells a [`ReminderView`]
//! which reminder to show, where, and what the countdown reads; the view
//! maps that onto whatever it renders into (page overlay, terminal, tests).

use meetcue_core::{CountdownFlags, Meeting};

/// Opaque handle to a rendered reminder, issued by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewHandle(pub u64);

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Corner of the viewport reminders cascade from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Where a reminder sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Offsets from the anchor corner, in pixels.
    Anchored {
        corner: Corner,
        horizontal: i32,
        vertical: i32,
    },
    /// Top-left position chosen by dragging.
    Manual { left: i32, top: i32 },
}

impl Placement {
    /// Returns true if the user placed the reminder by hand.
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual { .. })
    }
}

/// Rendering operations the scheduler issues.
pub trait ReminderView {
    /// Renders a new reminder and returns its handle.
    fn render_instance(&mut self, meeting: &Meeting, placement: Placement) -> ViewHandle;

    /// Replaces the title of a shown reminder.
    fn update_instance_title(&mut self, handle: ViewHandle, title: &str);

    /// Moves a shown reminder.
    fn move_instance(&mut self, handle: ViewHandle, placement: Placement);

    /// Renders the countdown text of a shown reminder.
    fn render_countdown(&mut self, handle: ViewHandle, text: &str, flags: CountdownFlags);

    /// Removes a reminder from the page.
    fn destroy_instance(&mut self, handle: ViewHandle);

    /// Opens `url` in a new tab or browser window.
    fn open_url(&mut self, url: &str);
}

impl<V: ReminderView + ?Sized> ReminderView for Box<V> {
    fn render_instance(&mut self, meeting: &Meeting, placement: Placement) -> ViewHandle {
        (**self).render_instance(meeting, placement)
    }

    fn update_instance_title(&mut self, handle: ViewHandle, title: &str) {
        (**self).update_instance_title(handle, title);
    }

    fn move_instance(&mut self, handle: ViewHandle, placement: Placement) {
        (**self).move_instance(handle, placement);
    }

    fn render_countdown(&mut self, handle: ViewHandle, text: &str, flags: CountdownFlags) {
        (**self).render_countdown(handle, text, flags);
    }

    fn destroy_instance(&mut self, handle: ViewHandle) {
        (**self).destroy_instance(handle);
    }

    fn open_url(&mut self, url: &str) {
        (**self).open_url(url);
    }
}
