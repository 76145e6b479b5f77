//! Shown reminders, their cascade layout, and drag handling.
//!
//! Default-positioned reminders stack from the anchor corner, one
//! [`CascadeLayout::step`] apart, in the order they were added. A reminder
//! that the user dragged keeps its manual position for good and is left
//! out of the cascade; the others close ranks whenever one goes away.

use meetcue_core::Meeting;
use tracing::debug;

use crate::task::TaskHandle;
use crate::view::{Corner, Placement, Point, ReminderView, ViewHandle};

/// Geometry of the default reminder cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeLayout {
    pub corner: Corner,
    /// Distance from both edges of the anchor corner.
    pub margin: i32,
    /// Vertical distance between two consecutive slots.
    pub step: i32,
}

impl Default for CascadeLayout {
    fn default() -> Self {
        Self {
            corner: Corner::BottomRight,
            margin: 16,
            step: 132,
        }
    }
}

impl CascadeLayout {
    /// Placement of the `index`-th default-positioned reminder.
    pub fn slot(&self, index: usize) -> Placement {
        let index = i32::try_from(index).unwrap_or(i32::MAX);
        Placement::Anchored {
            corner: self.corner,
            horizontal: self.margin,
            vertical: self.margin.saturating_add(self.step.saturating_mul(index)),
        }
    }
}

/// One reminder on screen.
#[derive(Debug)]
pub struct ReminderInstance {
    /// Latest snapshot of the meeting.
    pub meeting: Meeting,
    pub handle: ViewHandle,
    pub placement: Placement,
    pub(crate) tick: Option<TaskHandle>,
}

impl ReminderInstance {
    pub fn meeting_id(&self) -> &str {
        &self.meeting.id
    }

    /// Returns true once the user has dragged this reminder.
    pub fn is_manual(&self) -> bool {
        self.placement.is_manual()
    }

    pub(crate) fn cancel_tick(&mut self) {
        if let Some(task) = self.tick.take() {
            task.cancel();
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    meeting_id: String,
    /// Pointer position relative to the reminder's top-left corner.
    grab: Point,
}

/// Reminders currently shown, in insertion order.
#[derive(Debug, Default)]
pub struct ReminderRegistry {
    layout: CascadeLayout,
    instances: Vec<ReminderInstance>,
    drag: Option<ActiveDrag>,
}

impl ReminderRegistry {
    pub fn new(layout: CascadeLayout) -> Self {
        Self {
            layout,
            instances: Vec::new(),
            drag: None,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, meeting_id: &str) -> bool {
        self.get(meeting_id).is_some()
    }

    pub fn get(&self, meeting_id: &str) -> Option<&ReminderInstance> {
        self.instances.iter().find(|i| i.meeting.id == meeting_id)
    }

    pub fn get_mut(&mut self, meeting_id: &str) -> Option<&mut ReminderInstance> {
        self.instances.iter_mut().find(|i| i.meeting.id == meeting_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReminderInstance> {
        self.instances.iter()
    }

    /// Meeting ids of all shown reminders, in insertion order.
    pub fn meeting_ids(&self) -> Vec<String> {
        self.instances.iter().map(|i| i.meeting.id.clone()).collect()
    }

    /// Renders a reminder for `meeting` in the next free cascade slot.
    ///
    /// If one is already shown for the meeting, that one is returned and
    /// nothing is rendered.
    pub fn add_instance<V: ReminderView>(
        &mut self,
        meeting: Meeting,
        view: &mut V,
    ) -> &mut ReminderInstance {
        if let Some(index) = self.position(&meeting.id) {
            return &mut self.instances[index];
        }

        let slot = self.instances.iter().filter(|i| !i.is_manual()).count();
        let placement = self.layout.slot(slot);
        let handle = view.render_instance(&meeting, placement);
        debug!(meeting_id = %meeting.id, slot, "Rendered reminder");

        let index = self.instances.len();
        self.instances.push(ReminderInstance {
            meeting,
            handle,
            placement,
            tick: None,
        });
        &mut self.instances[index]
    }

    /// Removes the reminder for `meeting_id`, stops its countdown and
    /// closes the gap it leaves in the cascade.
    ///
    /// Returns the removed meeting, or `None` if nothing was shown for it.
    pub fn remove_instance<V: ReminderView>(
        &mut self,
        meeting_id: &str,
        view: &mut V,
    ) -> Option<Meeting> {
        let index = self.position(meeting_id)?;
        let mut instance = self.instances.remove(index);
        instance.cancel_tick();
        view.destroy_instance(instance.handle);

        if self.drag.as_ref().is_some_and(|d| d.meeting_id == meeting_id) {
            self.drag = None;
        }

        self.reposition_all(view);
        Some(instance.meeting)
    }

    /// Moves every default-positioned reminder to its cascade slot.
    ///
    /// Slots are assigned `0..n` in insertion order over the reminders the
    /// user has not dragged. Manually placed reminders are never touched.
    pub fn reposition_all<V: ReminderView>(&mut self, view: &mut V) {
        let layout = self.layout;
        for (slot, instance) in self
            .instances
            .iter_mut()
            .filter(|i| !i.is_manual())
            .enumerate()
        {
            let placement = layout.slot(slot);
            if instance.placement != placement {
                instance.placement = placement;
                view.move_instance(instance.handle, placement);
            }
        }
    }

    /// Starts dragging the reminder for `meeting_id`.
    ///
    /// `origin` is the reminder's current top-left corner in page
    /// coordinates, as reported by the view. From here on the reminder is
    /// manually placed and the remaining cascade closes up behind it. A
    /// drag already in progress is abandoned.
    pub fn drag_start<V: ReminderView>(
        &mut self,
        meeting_id: &str,
        pointer: Point,
        origin: Point,
        view: &mut V,
    ) -> bool {
        let Some(instance) = self.get_mut(meeting_id) else {
            return false;
        };
        instance.placement = Placement::Manual {
            left: origin.x,
            top: origin.y,
        };
        self.reposition_all(view);

        if let Some(previous) = self.drag.take() {
            debug!(meeting_id = %previous.meeting_id, "Abandoning previous drag");
        }
        self.drag = Some(ActiveDrag {
            meeting_id: meeting_id.to_string(),
            grab: Point::new(pointer.x - origin.x, pointer.y - origin.y),
        });
        true
    }

    /// Moves the dragged reminder so the grab point follows the pointer.
    pub fn drag_move<V: ReminderView>(&mut self, pointer: Point, view: &mut V) -> bool {
        let Some(drag) = self.drag.clone() else {
            return false;
        };
        let Some(instance) = self.get_mut(&drag.meeting_id) else {
            self.drag = None;
            return false;
        };
        let placement = Placement::Manual {
            left: pointer.x - drag.grab.x,
            top: pointer.y - drag.grab.y,
        };
        instance.placement = placement;
        view.move_instance(instance.handle, placement);
        true
    }

    /// Ends the active drag. The reminder stays where it was dropped.
    pub fn drag_end(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Meeting id of the reminder being dragged.
    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.meeting_id.as_str())
    }

    /// Removes every reminder.
    pub fn clear<V: ReminderView>(&mut self, view: &mut V) {
        self.drag = None;
        for mut instance in self.instances.drain(..) {
            instance.cancel_tick();
            view.destroy_instance(instance.handle);
        }
    }

    fn position(&self, meeting_id: &str) -> Option<usize> {
        self.instances.iter().position(|i| i.meeting.id == meeting_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingView, ViewCall, at, meeting};

    fn slot(index: i32) -> Placement {
        Placement::Anchored {
            corner: Corner::BottomRight,
            horizontal: 16,
            vertical: 16 + 132 * index,
        }
    }

    fn registry_with(ids: &[&str], view: &mut RecordingView) -> ReminderRegistry {
        let mut registry = ReminderRegistry::default();
        for id in ids {
            registry.add_instance(meeting(id, at(10, 0, 0)), view);
        }
        registry
    }

    #[test]
    fn cascade_slots() {
        let layout = CascadeLayout::default();
        assert_eq!(layout.slot(0), slot(0));
        assert_eq!(layout.slot(2), slot(2));
    }

    #[test]
    fn add_assigns_next_slot() {
        let mut view = RecordingView::default();
        let registry = registry_with(&["a", "b"], &mut view);

        assert_eq!(registry.get("a").unwrap().placement, slot(0));
        assert_eq!(registry.get("b").unwrap().placement, slot(1));
        assert_eq!(registry.meeting_ids(), vec!["a", "b"]);
    }

    #[test]
    fn add_existing_does_not_render_again() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a"], &mut view);
        registry.add_instance(meeting("a", at(10, 0, 0)), &mut view);

        assert_eq!(registry.len(), 1);
        assert_eq!(view.render_count("a"), 1);
    }

    #[test]
    fn removing_middle_closes_the_gap() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a", "b", "c"], &mut view);
        view.clear_calls();

        let removed = registry.remove_instance("b", &mut view).unwrap();
        assert_eq!(removed.id, "b");

        assert_eq!(registry.get("a").unwrap().placement, slot(0));
        assert_eq!(registry.get("c").unwrap().placement, slot(1));

        let handle_b = ViewHandle(2);
        let handle_c = registry.get("c").unwrap().handle;
        assert_eq!(
            view.calls(),
            vec![
                ViewCall::Destroy { handle: handle_b },
                ViewCall::Move {
                    handle: handle_c,
                    placement: slot(1),
                },
            ]
        );
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a"], &mut view);
        assert!(registry.remove_instance("zzz", &mut view).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dragged_reminder_is_never_repositioned() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a", "b", "c"], &mut view);

        assert!(registry.drag_start("c", Point::new(510, 420), Point::new(500, 400), &mut view));
        assert!(registry.drag_move(Point::new(110, 120), &mut view));
        assert!(registry.drag_end());

        let dropped = Placement::Manual {
            left: 100,
            top: 100,
        };
        assert_eq!(registry.get("c").unwrap().placement, dropped);

        registry.remove_instance("a", &mut view);
        assert_eq!(registry.get("b").unwrap().placement, slot(0));
        assert_eq!(registry.get("c").unwrap().placement, dropped);
        assert_eq!(view.shown("c").unwrap().placement, dropped);
    }

    #[test]
    fn manual_reminders_do_not_take_cascade_slots() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a"], &mut view);
        registry.drag_start("a", Point::new(5, 5), Point::new(0, 0), &mut view);
        registry.drag_end();

        registry.add_instance(meeting("b", at(10, 0, 0)), &mut view);
        assert_eq!(registry.get("b").unwrap().placement, slot(0));
    }

    #[test]
    fn drag_closes_cascade_gap_before_next_add() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a", "b"], &mut view);
        view.clear_calls();

        registry.drag_start("a", Point::new(20, 20), Point::new(10, 10), &mut view);
        let handle_b = registry.get("b").unwrap().handle;
        assert_eq!(registry.get("b").unwrap().placement, slot(0));
        assert_eq!(
            view.calls(),
            vec![ViewCall::Move {
                handle: handle_b,
                placement: slot(0),
            }]
        );
        registry.drag_end();

        registry.add_instance(meeting("c", at(10, 0, 0)), &mut view);
        assert_eq!(registry.get("b").unwrap().placement, slot(0));
        assert_eq!(registry.get("c").unwrap().placement, slot(1));
        assert_eq!(
            registry.get("a").unwrap().placement,
            Placement::Manual { left: 10, top: 10 }
        );
    }

    #[test]
    fn cascade_slots_stay_distinct_around_manual_reminders() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a", "b", "c"], &mut view);

        registry.drag_start("b", Point::new(0, 0), Point::new(0, 0), &mut view);
        registry.drag_end();
        registry.add_instance(meeting("d", at(10, 0, 0)), &mut view);
        registry.remove_instance("a", &mut view);
        registry.add_instance(meeting("e", at(10, 0, 0)), &mut view);

        let cascaded: Vec<Placement> = registry
            .iter()
            .filter(|i| !i.is_manual())
            .map(|i| i.placement)
            .collect();
        assert_eq!(cascaded, vec![slot(0), slot(1), slot(2)]);
        assert_eq!(view.shown("c").unwrap().placement, slot(0));
        assert_eq!(view.shown("e").unwrap().placement, slot(2));
    }

    #[test]
    fn new_drag_supersedes_active_drag() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a", "b"], &mut view);

        registry.drag_start("a", Point::new(0, 0), Point::new(0, 0), &mut view);
        registry.drag_start("b", Point::new(10, 10), Point::new(0, 0), &mut view);
        assert_eq!(registry.dragging(), Some("b"));

        registry.drag_move(Point::new(50, 50), &mut view);
        assert_eq!(
            registry.get("b").unwrap().placement,
            Placement::Manual { left: 40, top: 40 }
        );
        assert_eq!(
            registry.get("a").unwrap().placement,
            Placement::Manual { left: 0, top: 0 }
        );
    }

    #[test]
    fn drag_without_start_is_ignored() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a"], &mut view);
        assert!(!registry.drag_move(Point::new(1, 1), &mut view));
        assert!(!registry.drag_end());
        assert!(!registry.drag_start("zzz", Point::new(0, 0), Point::new(0, 0), &mut view));
    }

    #[test]
    fn removing_dragged_reminder_ends_drag() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a"], &mut view);
        registry.drag_start("a", Point::new(0, 0), Point::new(0, 0), &mut view);
        registry.remove_instance("a", &mut view);
        assert_eq!(registry.dragging(), None);
    }

    #[test]
    fn clear_destroys_everything() {
        let mut view = RecordingView::default();
        let mut registry = registry_with(&["a", "b"], &mut view);
        registry.clear(&mut view);
        assert!(registry.is_empty());
        assert!(view.shown_ids().is_empty());
    }
}
