//! Reminder scheduling.
//!
//! Every poll hands the full list of upcoming meetings to
//! [`ReminderScheduler::reconcile`], which splits them by how soon they
//! start:
//!
//! ```text
//!   now            now + display_window        now + approach_window
//!    │  display set: shown right away │  approach set: timer armed  │  ignored
//!    ▼────────────────────────────────▼─────────────────────────────▼────────►
//! ```
//!
//! A meeting is either shown or waiting on its promotion timer, never both.
//! Ignored meetings and the meeting whose room is already open on the
//! hosting page never get either.
//!
//! All state lives here and is only touched from the event loop. Timer
//! tasks report back through [`TimerEvent`]s, which are checked against
//! the task that is currently armed so late events from a cancelled task
//! do nothing.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use meetcue_core::{CountdownPhase, Meeting, MeetingRecord, extract_room_code};
use tracing::{debug, info, warn};

use crate::config::ReminderConfig;
use crate::countdown::CountdownDriver;
use crate::error::{ReminderError, ReminderResult};
use crate::ignore::IgnoreSet;
use crate::registry::ReminderRegistry;
use crate::task::{TaskHandle, TaskId, TimerEvent, Timers};
use crate::view::{Point, ReminderView};

/// Why a reminder was taken off the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// The user ignored the meeting.
    Ignored,
    /// The meeting started longer ago than the grace period.
    Expired,
    /// The fetch still lists the meeting, but it now starts beyond the
    /// approach window.
    Superseded,
    /// The meeting's room is open on the hosting page.
    OpenHere,
}

/// What one reconcile pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Meetings that got a new reminder.
    pub shown: Vec<String>,
    /// Meetings whose promotion timer was armed or re-armed.
    pub deferred: Vec<String>,
    /// Meetings whose promotion timer was cancelled.
    pub cancelled: Vec<String>,
    /// Meetings whose reminder was removed.
    pub removed: Vec<String>,
    /// Records dropped because they could not be validated.
    pub dropped: usize,
}

impl ReconcileReport {
    /// Returns true if the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.shown.is_empty()
            && self.deferred.is_empty()
            && self.cancelled.is_empty()
            && self.removed.is_empty()
    }
}

#[derive(Debug)]
struct Deferred {
    meeting: Meeting,
    task: TaskHandle,
}

/// Owns every piece of reminder state for one page.
pub struct ReminderScheduler<V> {
    config: ReminderConfig,
    view: V,
    timers: Timers,
    registry: ReminderRegistry,
    deferred: HashMap<String, Deferred>,
    ignored: IgnoreSet,
    countdown: CountdownDriver,
    page_room_code: Option<String>,
}

impl<V: ReminderView> ReminderScheduler<V> {
    /// Creates a scheduler rendering into `view` and arming timers with
    /// `timers`.
    pub fn new(config: ReminderConfig, view: V, timers: Timers) -> Self {
        let page_room_code = config.page_url.as_deref().and_then(extract_room_code);
        if let Some(ref code) = page_room_code {
            debug!(room_code = %code, "Hosting page is a meeting room");
        }

        Self {
            registry: ReminderRegistry::new(config.layout),
            countdown: CountdownDriver::new(config.countdown_policy(), config.tick_interval),
            config,
            view,
            timers,
            deferred: HashMap::new(),
            ignored: IgnoreSet::new(),
            page_room_code,
        }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn registry(&self) -> &ReminderRegistry {
        &self.registry
    }

    /// Meeting ids with a reminder on screen, in insertion order.
    pub fn shown_ids(&self) -> Vec<String> {
        self.registry.meeting_ids()
    }

    /// Meeting ids waiting on a promotion timer, sorted.
    pub fn deferred_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.deferred.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The promotion task currently armed for `meeting_id`.
    pub fn deferred_task(&self, meeting_id: &str) -> Option<TaskId> {
        self.deferred.get(meeting_id).map(|d| d.task.id())
    }

    pub fn is_ignored(&self, meeting_id: &str) -> bool {
        self.ignored.is_ignored(meeting_id)
    }

    /// Room code of the hosting page, if it is a meeting room.
    pub fn page_room_code(&self) -> Option<&str> {
        self.page_room_code.as_deref()
    }

    /// Records that the hosting page navigated to `url`.
    ///
    /// Takes effect on the next reconcile.
    pub fn set_page_url(&mut self, url: Option<&str>) {
        self.page_room_code = url.and_then(extract_room_code);
        self.config.page_url = url.map(str::to_string);
    }

    /// Validates raw records and reconciles the ones that pass.
    ///
    /// Records without an id or a start time are logged and dropped; they
    /// never affect the rest of the batch.
    pub fn reconcile_records(
        &mut self,
        records: Vec<MeetingRecord>,
        now: DateTime<Utc>,
    ) -> ReconcileReport {
        let mut dropped = 0;
        let meetings: Vec<Meeting> = records
            .into_iter()
            .filter_map(|record| match Meeting::try_from(record) {
                Ok(meeting) => Some(meeting),
                Err(err) => {
                    dropped += 1;
                    warn!(error = %ReminderError::from(err), "Dropping meeting record");
                    None
                }
            })
            .collect();

        let mut report = self.reconcile(&meetings, now);
        report.dropped = dropped;
        report
    }

    /// Brings reminders and promotion timers in line with `meetings`.
    ///
    /// Calling this twice with the same input at the same instant leaves
    /// the second call with nothing to do.
    pub fn reconcile(&mut self, meetings: &[Meeting], now: DateTime<Utc>) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut fetched: HashMap<&str, &Meeting> = HashMap::new();
        let mut display = Vec::new();
        let mut approach = Vec::new();

        for meeting in meetings {
            if fetched.contains_key(meeting.id.as_str()) {
                debug!(meeting_id = %meeting.id, "Skipping duplicate meeting");
                continue;
            }
            fetched.insert(meeting.id.as_str(), meeting);
            if self.ignored.is_ignored(&meeting.id) || self.is_open_here(meeting) {
                continue;
            }

            if meeting.has_started(now) {
                continue;
            }
            let until = meeting.time_until_start(now);
            if until <= self.config.display_window {
                display.push(meeting);
            } else if until <= self.config.approach_window {
                approach.push(meeting);
            }
        }
        display.sort_by_key(|m| m.start);

        for meeting in &display {
            if self.cancel_deferred(&meeting.id) {
                debug!(meeting_id = %meeting.id, "Meeting entered display window early");
            }
            if self.show(meeting, now) {
                report.shown.push(meeting.id.clone());
            }
        }

        for meeting in &approach {
            if self.refresh_instance(meeting) {
                continue;
            }
            if self.defer(meeting, now) {
                report.deferred.push(meeting.id.clone());
            }
        }

        let approach_ids: HashSet<&str> = approach.iter().map(|m| m.id.as_str()).collect();
        let mut stale: Vec<String> = self
            .deferred
            .keys()
            .filter(|id| !approach_ids.contains(id.as_str()))
            .cloned()
            .collect();
        stale.sort();
        for id in stale {
            self.cancel_deferred(&id);
            debug!(meeting_id = %id, "Cancelled promotion timer");
            report.cancelled.push(id);
        }

        let kept: HashSet<&str> = display
            .iter()
            .chain(approach.iter())
            .map(|m| m.id.as_str())
            .collect();
        for id in self.registry.meeting_ids() {
            if kept.contains(id.as_str()) {
                continue;
            }
            let latest = fetched.get(id.as_str()).copied();
            let Some(reason) = self
                .registry
                .get(&id)
                .and_then(|instance| self.eviction_reason(&instance.meeting, latest, now))
            else {
                continue;
            };
            if self.take_down(&id, reason) {
                report.removed.push(id);
            }
        }

        if !report.is_noop() {
            info!(
                shown = report.shown.len(),
                deferred = report.deferred.len(),
                cancelled = report.cancelled.len(),
                removed = report.removed.len(),
                "Reconciled reminders"
            );
        }
        report
    }

    /// Dispatches an event posted by a timer task.
    ///
    /// Events from a task that is no longer the armed one are dropped.
    pub fn handle_timer(&mut self, event: TimerEvent, now: DateTime<Utc>) {
        match event {
            TimerEvent::Promote { meeting_id, task } => self.promote(&meeting_id, task, now),
            TimerEvent::Tick { meeting_id, task } => {
                let current = self
                    .registry
                    .get(&meeting_id)
                    .and_then(|i| i.tick.as_ref().map(TaskHandle::id));
                if current != Some(task) {
                    debug!(meeting_id = %meeting_id, "Dropping stale countdown tick");
                    return;
                }
                self.tick(&meeting_id, now);
            }
        }
    }

    /// Re-renders the countdown of one reminder, removing it once expired.
    ///
    /// Returns `None` if no reminder is shown for `meeting_id`.
    pub fn tick(&mut self, meeting_id: &str, now: DateTime<Utc>) -> Option<CountdownPhase> {
        let instance = self.registry.get(meeting_id)?;
        let phase = self.countdown.render(instance, &mut self.view, now);
        if phase.is_expired() {
            self.take_down(meeting_id, Eviction::Expired);
        }
        Some(phase)
    }

    /// Ignores a meeting for the rest of the session.
    ///
    /// Its reminder and promotion timer go away and neither comes back.
    pub fn ignore(&mut self, meeting_id: &str) {
        if self.ignored.ignore(meeting_id) {
            info!(meeting_id = %meeting_id, "Meeting ignored");
        }
        if self.cancel_deferred(meeting_id) {
            debug!(meeting_id = %meeting_id, "Cancelled promotion timer");
        }
        self.take_down(meeting_id, Eviction::Ignored);
    }

    /// Opens the join URL of a shown reminder and returns it.
    ///
    /// # Errors
    ///
    /// - [`ReminderError::UnknownReminder`] if nothing is shown for `meeting_id`
    /// - [`ReminderError::NoJoinUrl`] if none of its join sources resolve
    pub fn join(&mut self, meeting_id: &str) -> ReminderResult<String> {
        let instance = self
            .registry
            .get(meeting_id)
            .ok_or_else(|| ReminderError::unknown_reminder(meeting_id))?;
        let url = instance
            .meeting
            .join_url()
            .ok_or_else(|| ReminderError::no_join_url(meeting_id))?;

        info!(meeting_id = %meeting_id, url = %url, "Joining meeting");
        self.view.open_url(&url);
        Ok(url)
    }

    /// See [`ReminderRegistry::drag_start`].
    pub fn drag_start(&mut self, meeting_id: &str, pointer: Point, origin: Point) -> bool {
        self.registry
            .drag_start(meeting_id, pointer, origin, &mut self.view)
    }

    /// See [`ReminderRegistry::drag_move`].
    pub fn drag_move(&mut self, pointer: Point) -> bool {
        self.registry.drag_move(pointer, &mut self.view)
    }

    /// See [`ReminderRegistry::drag_end`].
    pub fn drag_end(&mut self) -> bool {
        self.registry.drag_end()
    }

    /// Removes every reminder and cancels every timer.
    ///
    /// The ignore set survives.
    pub fn clear(&mut self) {
        self.deferred.clear();
        self.registry.clear(&mut self.view);
    }

    fn is_open_here(&self, meeting: &Meeting) -> bool {
        self.page_room_code
            .as_deref()
            .is_some_and(|code| meeting.room_code().as_deref() == Some(code))
    }

    /// Decides whether a reminder outside both windows goes away.
    ///
    /// `latest` is the meeting as listed by this fetch, if it was listed at
    /// all. A reminder missing from the fetch is kept until its countdown
    /// runs past the grace period.
    fn eviction_reason(
        &self,
        shown: &Meeting,
        latest: Option<&Meeting>,
        now: DateTime<Utc>,
    ) -> Option<Eviction> {
        if self.ignored.is_ignored(&shown.id) {
            Some(Eviction::Ignored)
        } else if self.is_open_here(shown) {
            Some(Eviction::OpenHere)
        } else if now - shown.start > self.config.grace_period {
            Some(Eviction::Expired)
        } else if latest.is_some_and(|m| !m.has_started(now)) {
            Some(Eviction::Superseded)
        } else {
            None
        }
    }

    /// Shows a reminder for `meeting`. Returns true if a new one was
    /// rendered.
    fn show(&mut self, meeting: &Meeting, now: DateTime<Utc>) -> bool {
        if self.refresh_instance(meeting) {
            return false;
        }

        let instance = self.registry.add_instance(meeting.clone(), &mut self.view);
        let phase = self
            .countdown
            .start(instance, &mut self.timers, &mut self.view, now);
        if phase.is_expired() {
            self.take_down(&meeting.id, Eviction::Expired);
            return false;
        }

        info!(
            meeting_id = %meeting.id,
            title = %meeting.title,
            starts_in_secs = meeting.time_until_start(now).num_seconds(),
            "Showing reminder"
        );
        true
    }

    /// Updates the snapshot of a shown reminder. Returns false if none is
    /// shown for the meeting.
    fn refresh_instance(&mut self, meeting: &Meeting) -> bool {
        let Some(instance) = self.registry.get_mut(&meeting.id) else {
            return false;
        };
        if instance.meeting.title != meeting.title {
            self.view
                .update_instance_title(instance.handle, &meeting.title);
        }
        instance.meeting = meeting.clone();
        true
    }

    /// Arms the promotion timer for `meeting`. Returns true if a timer was
    /// armed, false if the current one already targets the same start.
    fn defer(&mut self, meeting: &Meeting, now: DateTime<Utc>) -> bool {
        if let Some(entry) = self.deferred.get_mut(&meeting.id) {
            if entry.meeting.start == meeting.start {
                entry.meeting = meeting.clone();
                return false;
            }
            debug!(meeting_id = %meeting.id, "Meeting rescheduled, re-arming promotion");
        }
        self.cancel_deferred(&meeting.id);

        let delay = (meeting.time_until_start(now) - self.config.display_window)
            .to_std()
            .unwrap_or_default();
        let task = self.timers.schedule_promotion(&meeting.id, delay);
        debug!(
            meeting_id = %meeting.id,
            delay_secs = delay.as_secs(),
            "Armed promotion timer"
        );

        self.deferred.insert(
            meeting.id.clone(),
            Deferred {
                meeting: meeting.clone(),
                task,
            },
        );
        true
    }

    fn cancel_deferred(&mut self, meeting_id: &str) -> bool {
        match self.deferred.remove(meeting_id) {
            Some(entry) => {
                entry.task.cancel();
                true
            }
            None => false,
        }
    }

    fn promote(&mut self, meeting_id: &str, task: TaskId, now: DateTime<Utc>) {
        if self.deferred_task(meeting_id) != Some(task) {
            debug!(meeting_id = %meeting_id, "Dropping stale promotion");
            return;
        }
        let Some(Deferred { meeting, .. }) = self.deferred.remove(meeting_id) else {
            return;
        };

        if self.ignored.is_ignored(&meeting.id) || self.is_open_here(&meeting) {
            return;
        }
        if self.show(&meeting, now) {
            debug!(meeting_id = %meeting.id, "Promoted deferred meeting");
        }
    }

    fn take_down(&mut self, meeting_id: &str, reason: Eviction) -> bool {
        let removed = self
            .registry
            .remove_instance(meeting_id, &mut self.view)
            .is_some();
        if removed {
            info!(meeting_id = %meeting_id, reason = ?reason, "Removed reminder");
        }
        removed
    }
}
