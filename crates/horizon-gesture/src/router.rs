//! Touch routing: from raw root events to per-handler pointer events.
//!
//! One [`RootRouter`] exists per gesture root. For every raw event it
//! resolves the handlers attached to the touched views and dispatches
//! synthesized per-handler events in child-before-parent order (views are
//! processed in reverse activation order, so nested recognizers get first
//! refusal).
//!
//! The touched view set is cached at pointer-down and reference-counted
//! across pointers sharing a view, so later move events are not re-resolved
//! against possibly-changed layout and a handler cannot lose its target
//! mid-gesture.

use std::collections::{HashMap, HashSet};

use horizon_gesture_core::diagnostics::{targets, TraceSpan};
use horizon_gesture_core::{Point, PointerId, PointerType, ViewTag};

use crate::error::GestureResult;
use crate::event::{EventType, PointerEvent, RawTouchEvent, TouchAction, TouchPhase};
use crate::handler::EngineCtx;

/// A set of view tags with per-tag reference counts, preserving first
/// insertion order. Views are keyed by their stable integer tags, never by
/// object identity.
#[derive(Debug, Default)]
pub(crate) struct RefCountSet {
    counts: HashMap<ViewTag, usize>,
    order: Vec<ViewTag>,
}

impl RefCountSet {
    /// Increment a tag's count, inserting it on first reference.
    pub fn add(&mut self, tag: ViewTag) {
        let count = self.counts.entry(tag).or_insert(0);
        if *count == 0 {
            self.order.push(tag);
        }
        *count += 1;
    }

    /// Decrement a tag's count; the tag leaves the set at zero.
    /// Returns true when this removal dropped the last reference.
    pub fn remove(&mut self, tag: ViewTag) -> bool {
        match self.counts.get_mut(&tag) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.counts.remove(&tag);
                self.order.retain(|t| *t != tag);
                true
            }
            None => false,
        }
    }

    /// Tags currently referenced, in first-insertion order.
    pub fn elements(&self) -> &[ViewTag] {
        &self.order
    }
}

/// Per-view touch controller: tracks which pointers are down on the view
/// and which are inside its bounds, and classifies raw touches into
/// per-handler event types.
#[derive(Debug)]
pub(crate) struct ViewController {
    view_tag: ViewTag,
    active_pointer_ids: HashSet<PointerId>,
    pointer_ids_in_bounds: HashSet<PointerId>,
}

impl ViewController {
    fn new(view_tag: ViewTag) -> Self {
        Self {
            view_tag,
            active_pointer_ids: HashSet::new(),
            pointer_ids_in_bounds: HashSet::new(),
        }
    }

    /// Route one raw touch to every handler attached to this view.
    fn handle_touch(&mut self, ctx: &mut EngineCtx<'_>, action: TouchAction, raw: &RawTouchEvent) {
        let changed = raw.action_touch;
        let position = Point::new(changed.window_x, changed.window_y);
        let is_in_bounds = ctx.views.is_position_in_bounds(self.view_tag, position);

        // A pointer-down outside the view never generates a DOWN there.
        if action == TouchAction::Down && !is_in_bounds {
            return;
        }

        let was_in_bounds = self.pointer_ids_in_bounds.contains(&changed.pointer_id);
        let event_type = self.classify(action, is_in_bounds, changed.pointer_id, was_in_bounds);
        self.update_pointers_in_bounds(action, changed.pointer_id, is_in_bounds);
        self.update_active_pointers(action, changed.pointer_id);

        let rect = ctx.views.rect_of(self.view_tag).unwrap_or_default();
        let adapted = PointerEvent {
            x: changed.window_x,
            y: changed.window_y,
            offset_x: changed.window_x - rect.x,
            offset_y: changed.window_y - rect.y,
            pointer_id: changed.pointer_id,
            event_type,
            pointer_type: PointerType::from_source_code(raw.source_type),
            time_nanos: raw.timestamp_nanos,
            touch_points: raw.touch_points.clone(),
            touch_phase: TouchPhase::from_action(action),
        };

        for handler in ctx.handlers.handlers_for_view(self.view_tag) {
            match event_type {
                EventType::Down => ctx.on_pointer_down(handler, &adapted),
                EventType::AdditionalPointerDown => {
                    ctx.on_additional_pointer_add(handler, &adapted)
                }
                EventType::Up => ctx.on_pointer_up(handler, &adapted),
                EventType::AdditionalPointerUp => {
                    ctx.on_additional_pointer_remove(handler, &adapted)
                }
                EventType::Move => {
                    if !was_in_bounds && !is_in_bounds {
                        ctx.on_pointer_out_of_bounds(handler, &adapted);
                    } else {
                        ctx.on_pointer_move(handler, &adapted);
                    }
                }
                EventType::Enter => ctx.on_pointer_enter(handler, &adapted),
                EventType::Out => ctx.on_pointer_out(handler, &adapted),
                EventType::Cancel => ctx.on_pointer_cancel(handler, &adapted),
            }
        }
    }

    /// The routing decision table per (touch type, bounds transition,
    /// active pointer count excluding the changed pointer).
    fn classify(
        &self,
        action: TouchAction,
        is_in_bounds: bool,
        pointer_id: PointerId,
        was_in_bounds: bool,
    ) -> EventType {
        let mut other_active = self.active_pointer_ids.len();
        if self.active_pointer_ids.contains(&pointer_id) {
            other_active -= 1;
        }
        match action {
            TouchAction::Down => {
                if other_active > 0 {
                    EventType::AdditionalPointerDown
                } else {
                    EventType::Down
                }
            }
            TouchAction::Up => {
                if other_active > 1 {
                    EventType::AdditionalPointerUp
                } else {
                    EventType::Up
                }
            }
            TouchAction::Move => {
                if is_in_bounds {
                    if was_in_bounds {
                        EventType::Move
                    } else {
                        EventType::Enter
                    }
                } else if was_in_bounds {
                    EventType::Out
                } else {
                    // Forwarded as a move, flagged out-of-bounds upstream.
                    EventType::Move
                }
            }
            TouchAction::Cancel => EventType::Cancel,
        }
    }

    fn update_pointers_in_bounds(
        &mut self,
        action: TouchAction,
        pointer_id: PointerId,
        is_in_bounds: bool,
    ) {
        match action {
            TouchAction::Down => {
                if is_in_bounds {
                    self.pointer_ids_in_bounds.insert(pointer_id);
                }
            }
            TouchAction::Move => {
                if is_in_bounds {
                    self.pointer_ids_in_bounds.insert(pointer_id);
                } else {
                    self.pointer_ids_in_bounds.remove(&pointer_id);
                }
            }
            TouchAction::Up | TouchAction::Cancel => {
                self.pointer_ids_in_bounds.remove(&pointer_id);
            }
        }
    }

    fn update_active_pointers(&mut self, action: TouchAction, pointer_id: PointerId) {
        match action {
            TouchAction::Down => {
                self.active_pointer_ids.insert(pointer_id);
            }
            TouchAction::Up => {
                self.active_pointer_ids.remove(&pointer_id);
            }
            TouchAction::Cancel => {
                self.active_pointer_ids.clear();
            }
            TouchAction::Move => {}
        }
    }
}

/// Routes raw touch events for one gesture root.
#[derive(Debug)]
pub struct RootRouter {
    root_tag: ViewTag,
    /// Touched views cached at pointer-down, refcounted across pointers.
    touchable_views: RefCountSet,
    /// Lazily created per-view controllers, evicted when the last pointer
    /// referencing the view lifts.
    controllers: HashMap<ViewTag, ViewController>,
    /// Views that received the current sequence's pointer-down, in
    /// activation order.
    active_view_tags: Vec<ViewTag>,
}

impl RootRouter {
    pub(crate) fn new(root_tag: ViewTag) -> Self {
        Self {
            root_tag,
            touchable_views: RefCountSet::default(),
            controllers: HashMap::new(),
            active_view_tags: Vec::new(),
        }
    }

    /// Route one raw event through hit caching, controller resolution and
    /// child-before-parent dispatch.
    pub(crate) fn handle_touch(
        &mut self,
        ctx: &mut EngineCtx<'_>,
        raw: &RawTouchEvent,
    ) -> GestureResult<()> {
        let _span = TraceSpan::new("route_touch");
        let action = TouchAction::from_code(raw.action)?;

        if action == TouchAction::Down {
            for view in &raw.touchable_views {
                self.touchable_views.add(view.tag);
            }
            self.active_view_tags.clear();
        }

        for view in &raw.touchable_views {
            let handlers = ctx.handlers.handlers_for_view(view.tag);
            if handlers.is_empty() {
                // Not an error: a touched view without handlers is a no-op.
                continue;
            }
            tracing::trace!(
                target: targets::ROUTER,
                view = view.tag,
                handlers = handlers.len(),
                button_role = ctx.views.has_button_role(view.tag),
                "resolved handlers for touched view"
            );
            self.controllers
                .entry(view.tag)
                .or_insert_with(|| ViewController::new(view.tag));
            if action == TouchAction::Down && !self.active_view_tags.contains(&view.tag) {
                self.active_view_tags.push(view.tag);
            }
        }

        // Register the whole touched stack before any dispatch, so waitFor
        // dependencies between handlers of this sequence are visible from
        // the very first DOWN delivery.
        if action == TouchAction::Down {
            for view_tag in self.active_view_tags.clone() {
                for handler in ctx.handlers.handlers_for_view(view_tag) {
                    ctx.record_handler_if_not_present(handler);
                }
            }
        }

        // Child before parent: the most recently activated (innermost)
        // view gets first refusal.
        for view_tag in self.active_view_tags.clone().into_iter().rev() {
            if let Some(controller) = self.controllers.get_mut(&view_tag) {
                controller.handle_touch(ctx, action, raw);
            }
        }

        if matches!(action, TouchAction::Up | TouchAction::Cancel) {
            for view in &raw.touchable_views {
                if self.touchable_views.remove(view.tag) {
                    self.controllers.remove(&view.tag);
                }
            }
        }
        Ok(())
    }

    /// Host-forced cancellation of every handler attached to this root's
    /// active views.
    pub(crate) fn cancel_touches(&mut self, ctx: &mut EngineCtx<'_>) {
        tracing::debug!(
            target: targets::ROUTER,
            root = self.root_tag,
            views = self.active_view_tags.len(),
            "forced touch cancellation"
        );
        ctx.force_cancel_views(&self.active_view_tags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refcount_set_tracks_counts() {
        let mut set = RefCountSet::default();
        set.add(1);
        set.add(1);
        set.add(2);
        assert_eq!(set.elements(), &[1, 2]);

        assert!(!set.remove(1)); // one reference remains
        assert!(set.elements().contains(&1));
        assert!(set.remove(1));
        assert!(!set.elements().contains(&1));
        assert_eq!(set.elements(), &[2]);
    }

    #[test]
    fn test_refcount_set_ignores_unknown_removal() {
        let mut set = RefCountSet::default();
        assert!(!set.remove(7));
    }

    #[test]
    fn test_classification_down_and_additional_down() {
        let mut controller = ViewController::new(1);
        assert_eq!(
            controller.classify(TouchAction::Down, true, 1, false),
            EventType::Down
        );
        controller.update_active_pointers(TouchAction::Down, 1);
        assert_eq!(
            controller.classify(TouchAction::Down, true, 2, false),
            EventType::AdditionalPointerDown
        );
    }

    #[test]
    fn test_classification_up_and_additional_up() {
        let mut controller = ViewController::new(1);
        for pointer in [1, 2, 3] {
            controller.update_active_pointers(TouchAction::Down, pointer);
        }
        // Two other pointers remain: additional up.
        assert_eq!(
            controller.classify(TouchAction::Up, true, 1, true),
            EventType::AdditionalPointerUp
        );
        controller.update_active_pointers(TouchAction::Up, 1);
        // One other pointer remains: plain up.
        assert_eq!(
            controller.classify(TouchAction::Up, true, 2, true),
            EventType::Up
        );
    }

    #[test]
    fn test_classification_move_bounds_transitions() {
        let controller = ViewController::new(1);
        assert_eq!(
            controller.classify(TouchAction::Move, true, 1, true),
            EventType::Move
        );
        assert_eq!(
            controller.classify(TouchAction::Move, true, 1, false),
            EventType::Enter
        );
        assert_eq!(
            controller.classify(TouchAction::Move, false, 1, true),
            EventType::Out
        );
        assert_eq!(
            controller.classify(TouchAction::Move, false, 1, false),
            EventType::Move
        );
    }

    #[test]
    fn test_classification_cancel() {
        let controller = ViewController::new(1);
        assert_eq!(
            controller.classify(TouchAction::Cancel, false, 1, false),
            EventType::Cancel
        );
    }
}
