//! Meetings the user dismissed for the rest of the session.

use std::collections::HashSet;

/// Insert-only set of ignored meeting ids.
///
/// An ignored meeting never gets a reminder or a promotion timer again.
/// There is no way to un-ignore; the set lives as long as the scheduler.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    ids: HashSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores `meeting_id`. Returns false if it was already ignored.
    pub fn ignore(&mut self, meeting_id: &str) -> bool {
        self.ids.insert(meeting_id.to_string())
    }

    pub fn is_ignored(&self, meeting_id: &str) -> bool {
        self.ids.contains(meeting_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
