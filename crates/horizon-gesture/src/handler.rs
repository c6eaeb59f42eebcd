//! The per-handler state machine.
//!
//! A [`GestureHandler`] is the engine's record for one registered recognizer:
//! its configuration, lifecycle [`State`], pointer tracker and delivery
//! dispatcher. Handlers are owned by the
//! [`HandlerRegistry`](crate::registry::HandlerRegistry) and referenced by
//! tag everywhere else.
//!
//! Transitions are driven through [`EngineCtx`], a per-event processing
//! context borrowing the registry, the relation graph, the view cache and
//! the orchestrator. Lifecycle methods live here; the arbitration side
//! effects they trigger live in [`crate::orchestrator`]. Every transition is
//! idempotent and runs synchronously within the current processing step.

use std::fmt;

use horizon_gesture_core::diagnostics::targets;
use horizon_gesture_core::{HandlerTag, Point, PointerType, Rect, ViewTag};

use crate::config::{ConfigUpdate, HandlerConfig};
use crate::dispatch::{DeliveryChannel, EventDispatcher};
use crate::event::{
    EventType, GestureEvent, GestureTouchEvent, PointerEvent, StateChangeEvent, Touch, TouchPhase,
};
use crate::interaction::InteractionManager;
use crate::orchestrator::Orchestrator;
use crate::recognizers::{Recognizer, RecognizerCtx};
use crate::registry::{HandlerRegistry, ViewRegistry};
use crate::state::State;

/// Activation index value for handlers that have not left UNDETERMINED yet.
pub(crate) const UNSET_ACTIVATION_INDEX: u64 = u64::MAX;

/// One registered gesture handler.
pub struct GestureHandler {
    pub(crate) tag: HandlerTag,
    /// Factory name of the recognizer family.
    pub(crate) kind: &'static str,
    /// Whether the recognizer reports continuous progress while active.
    pub(crate) continuous: bool,
    /// Whether the recognizer globally opts out of exclusive arbitration.
    pub(crate) simultaneous_with_all: bool,
    pub(crate) config: HandlerConfig,
    pub(crate) state: State,
    pub(crate) last_sent_state: Option<State>,
    pub(crate) view: Option<ViewTag>,
    pub(crate) channel: Option<DeliveryChannel>,
    pub(crate) dispatcher: Option<Box<dyn EventDispatcher>>,
    pub(crate) tracker: crate::tracker::PointerTracker,
    pub(crate) pointer_type: PointerType,
    pub(crate) is_activated: bool,
    pub(crate) is_awaiting: bool,
    /// Set when `activate()` was requested while parked behind a waitFor
    /// dependency; replayed when the dependency resolves.
    pub(crate) pending_activation: bool,
    pub(crate) activation_index: u64,
    pub(crate) should_cancel_when_outside: bool,
    /// Taken out while a recognizer hook runs, put back afterwards.
    pub(crate) recognizer: Option<Box<dyn Recognizer>>,
    /// Pending recognizer deadline in nanoseconds, if any.
    pub(crate) deadline_nanos: Option<u64>,
}

impl fmt::Debug for GestureHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureHandler")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("state", &self.state.name())
            .field("view", &self.view)
            .field("channel", &self.channel)
            .field("awaiting", &self.is_awaiting)
            .finish_non_exhaustive()
    }
}

impl GestureHandler {
    /// Create a handler around a recognizer, seeded with the recognizer's
    /// default configuration.
    pub(crate) fn new(tag: HandlerTag, recognizer: Box<dyn Recognizer>) -> Self {
        let config = recognizer.default_config();
        let should_cancel_when_outside = config
            .should_cancel_when_outside
            .unwrap_or_else(|| recognizer.default_should_cancel_when_outside());
        Self {
            tag,
            kind: recognizer.kind(),
            continuous: recognizer.is_continuous(),
            simultaneous_with_all: recognizer.prefers_simultaneous_recognition(),
            config,
            state: State::Undetermined,
            last_sent_state: None,
            view: None,
            channel: None,
            dispatcher: None,
            tracker: crate::tracker::PointerTracker::new(),
            pointer_type: PointerType::default(),
            is_activated: false,
            is_awaiting: false,
            pending_activation: false,
            activation_index: UNSET_ACTIVATION_INDEX,
            should_cancel_when_outside,
            recognizer: Some(recognizer),
            deadline_nanos: None,
        }
    }

    /// Merge a sparse configuration update into the handler.
    pub(crate) fn apply_config(&mut self, update: &ConfigUpdate) {
        self.config.apply(update);
        if let Some(should_cancel) = self.config.should_cancel_when_outside {
            self.should_cancel_when_outside = should_cancel;
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// The hit-slop-expanded bounds test for `begin()`.
    ///
    /// Explicit side values take precedence over the symmetric
    /// horizontal/vertical shorthands; width/height reinterpret one pair of
    /// sides relative to the other. Without a configured slop the test
    /// passes: the router never delivers a pointer-down outside the view.
    pub(crate) fn is_within_hit_slop(&self, rect: Rect) -> bool {
        let Some(slop) = self.config.hit_slop else {
            return true;
        };

        let mut left = 0.0;
        let mut top = 0.0;
        let mut right = rect.width;
        let mut bottom = rect.height;

        if let Some(horizontal) = slop.horizontal {
            left -= horizontal;
            right += horizontal;
        }
        if let Some(vertical) = slop.vertical {
            top -= vertical;
            bottom += vertical;
        }
        if let Some(l) = slop.left {
            left = -l;
        }
        if let Some(r) = slop.right {
            right = rect.width + r;
        }
        if let Some(t) = slop.top {
            top = -t;
        }
        if let Some(b) = slop.bottom {
            bottom = rect.height + b;
        }
        if let Some(width) = slop.width {
            if slop.left.is_some() {
                right = left + width;
            } else if slop.right.is_some() {
                left = right - width;
            }
        }
        if let Some(height) = slop.height {
            if slop.top.is_some() {
                bottom = top + height;
            } else if slop.bottom.is_some() {
                top = bottom - height;
            }
        }

        let Some(last) = self.tracker.last_position() else {
            return false;
        };
        let offset_x = last.x - rect.x;
        let offset_y = last.y - rect.y;
        offset_x >= left && offset_x <= right && offset_y >= top && offset_y <= bottom
    }

    /// Snapshot every tracked pointer as outgoing touch records.
    fn touch_list(&self, rect: Rect) -> Vec<Touch> {
        self.tracker
            .iter()
            .filter_map(|(pointer_id, entry)| {
                let id = self.tracker.mapped_touch_id(pointer_id)?;
                Some(Touch {
                    id,
                    x: entry.last.x - rect.x,
                    y: entry.last.y - rect.y,
                    absolute_x: entry.last.x,
                    absolute_y: entry.last.y,
                })
            })
            .collect()
    }

    /// Build the outgoing touch record for an adapted event, or `None` when
    /// the tracker no longer tracks the event's pointer (all pointers were
    /// cancelled and the tracker already reset).
    pub(crate) fn transform_touch_event(
        &self,
        event: &PointerEvent,
        rect: Rect,
    ) -> Option<GestureTouchEvent> {
        if self.tracker.is_empty() || !self.tracker.has(event.pointer_id) {
            return None;
        }

        let all = self.touch_list(rect);

        // Each pointer reports its own change; a cancel flushes every
        // tracked pointer so downstream consumers can close them all.
        let changed = if event.event_type != EventType::Cancel {
            let id = self.tracker.mapped_touch_id(event.pointer_id)?;
            vec![Touch {
                id,
                x: event.x - rect.x,
                y: event.y - rect.y,
                absolute_x: event.x,
                absolute_y: event.y,
            }]
        } else {
            all.clone()
        };

        // An UP event reports one pointer less while the lifting pointer is
        // still listed in `all_touches` so its final data stays readable.
        let mut number_of_touches = all.len();
        if matches!(
            event.event_type,
            EventType::Up | EventType::AdditionalPointerUp
        ) {
            number_of_touches = number_of_touches.saturating_sub(1);
        }

        Some(GestureTouchEvent {
            handler_tag: self.tag,
            state: self.state,
            phase: event.touch_phase,
            changed_touches: changed,
            all_touches: all,
            number_of_touches,
        })
    }

    /// The synthetic cancelled-touch flush emitted when a handler with
    /// tracked pointers reaches a terminal state.
    pub(crate) fn cancelled_touches_event(&self, rect: Rect) -> Option<GestureTouchEvent> {
        if self.tracker.is_empty() {
            return None;
        }
        let all = self.touch_list(rect);
        Some(GestureTouchEvent {
            handler_tag: self.tag,
            state: self.state,
            phase: TouchPhase::Cancelled,
            changed_touches: all.clone(),
            number_of_touches: all.len(),
            all_touches: all,
        })
    }

    fn create_state_change_event(
        &self,
        new_state: State,
        old_state: State,
        rect: Rect,
    ) -> StateChangeEvent {
        let average = self.tracker.average_position();
        StateChangeEvent {
            handler_tag: self.tag,
            target: self.view.unwrap_or_default(),
            state: new_state,
            old_state: (new_state != old_state).then_some(old_state),
            number_of_pointers: self.tracker.count(),
            pointer_inside: rect.contains(average),
            x: average.x - rect.x,
            y: average.y - rect.y,
            absolute_x: average.x,
            absolute_y: average.y,
        }
    }

    /// Emit a state-change event, deduplicated against the last sent state;
    /// while the handler is ACTIVE a progress event also goes out on the
    /// gesture-event channel.
    pub(crate) fn send_event(&mut self, new_state: State, old_state: State, rect: Rect) {
        let event = self.create_state_change_event(new_state, old_state, rect);
        let Some(dispatcher) = self.dispatcher.as_mut() else {
            tracing::debug!(
                target: targets::DISPATCH,
                handler = self.tag,
                "no dispatcher attached, dropping event"
            );
            return;
        };
        if self.last_sent_state != Some(new_state) {
            self.last_sent_state = Some(new_state);
            dispatcher.on_state_change(&event);
        }
        if self.state == State::Active {
            let mut progress = event;
            progress.old_state = None;
            dispatcher.on_gesture_event(&GestureEvent::Update(progress));
        }
    }

    /// Forward raw pointer data, if the recognizer asked for it.
    fn send_touch_event(&mut self, event: &PointerEvent, rect: Rect) {
        if !self.is_enabled() {
            return;
        }
        let Some(touch_event) = self.transform_touch_event(event, rect) else {
            return;
        };
        if let Some(dispatcher) = self.dispatcher.as_mut() {
            dispatcher.on_gesture_event(&GestureEvent::Touch(touch_event));
        }
    }
}

/// Borrowed processing context for one engine operation.
///
/// All shared mutable state is owned by the engine facade and borrowed here
/// for the duration of a single synchronous processing step; cascaded
/// transitions (a cancellation triggering dependent notifications) run as
/// nested method calls on the same context.
pub(crate) struct EngineCtx<'a> {
    pub handlers: &'a mut HandlerRegistry,
    pub views: &'a ViewRegistry,
    pub interactions: &'a InteractionManager,
    pub orchestrator: &'a mut Orchestrator,
}

impl EngineCtx<'_> {
    /// The bounding box of the handler's attached view.
    pub(crate) fn view_rect(&self, tag: HandlerTag) -> Rect {
        self.handlers
            .get(tag)
            .and_then(|handler| handler.view)
            .and_then(|view| self.views.rect_of(view))
            .unwrap_or(Rect::ZERO)
    }

    // ------------------------------------------------------------------
    // Lifecycle transitions
    // ------------------------------------------------------------------

    /// UNDETERMINED → BEGAN, if the last tracked position passes the
    /// hit-slop test. Parks the handler instead when a waitFor dependency
    /// is unresolved, leaving it UNDETERMINED.
    pub(crate) fn begin(&mut self, tag: HandlerTag) {
        let Some(handler) = self.handlers.get(tag) else {
            return;
        };
        if handler.state != State::Undetermined {
            return;
        }
        if !handler.is_within_hit_slop(self.view_rect(tag)) {
            return;
        }
        if self.has_other_handler_to_wait_for(tag) {
            self.add_awaiting_handler(tag);
            return;
        }
        self.move_to_state(tag, State::Began);
    }

    /// BEGAN|UNDETERMINED → ACTIVE. Parked instead when a waitFor
    /// dependency is unresolved; the activation replays on release.
    pub(crate) fn activate(&mut self, tag: HandlerTag) {
        let Some(handler) = self.handlers.get(tag) else {
            return;
        };
        if !matches!(handler.state, State::Undetermined | State::Began) {
            return;
        }
        if self.has_other_handler_to_wait_for(tag) {
            self.add_awaiting_handler(tag);
            if let Some(handler) = self.handlers.get_mut(tag) {
                handler.pending_activation = true;
            }
            return;
        }
        self.move_to_state(tag, State::Active);
    }

    /// ACTIVE|BEGAN → FAILED; recognizer progress resets regardless of
    /// prior state.
    pub(crate) fn fail(&mut self, tag: HandlerTag) {
        let state = self.handlers.get(tag).map(|handler| handler.state);
        if matches!(state, Some(State::Active | State::Began)) {
            self.move_to_state(tag, State::Failed);
        }
        self.reset_progress(tag);
    }

    /// ACTIVE|UNDETERMINED|BEGAN → CANCELLED; the recognizer's cancel hook
    /// runs before the transition so in-flight touch data can be flushed.
    pub(crate) fn cancel(&mut self, tag: HandlerTag) {
        let state = self.handlers.get(tag).map(|handler| handler.state);
        if matches!(
            state,
            Some(State::Active | State::Undetermined | State::Began)
        ) {
            self.with_recognizer(tag, |recognizer, ctx| recognizer.on_cancel(ctx));
            self.move_to_state(tag, State::Cancelled);
        }
    }

    /// BEGAN|ACTIVE → END.
    pub(crate) fn end(&mut self, tag: HandlerTag) {
        let state = self.handlers.get(tag).map(|handler| handler.state);
        if matches!(state, Some(State::Began | State::Active)) {
            self.move_to_state(tag, State::End);
        }
        self.reset_progress(tag);
    }

    /// Idempotent state transition: orchestrator notification first, then
    /// the recognizer hook, then the forced reset for disabled handlers.
    pub(crate) fn move_to_state(&mut self, tag: HandlerTag, new_state: State) {
        let Some(handler) = self.handlers.get(tag) else {
            return;
        };
        let old_state = handler.state;
        if new_state == old_state {
            return;
        }
        tracing::debug!(
            target: targets::HANDLER,
            handler = tag,
            from = old_state.name(),
            to = new_state.name(),
            "state transition"
        );

        let rect = self.view_rect(tag);
        let handler = self
            .handlers
            .get_mut(tag)
            .expect("handler verified present above");
        handler.state = new_state;
        if old_state == State::Undetermined
            && handler.activation_index == UNSET_ACTIVATION_INDEX
        {
            handler.activation_index = self.orchestrator.next_activation_index();
        }
        if new_state.is_terminal() {
            handler.deadline_nanos = None;
            // Flush in-flight pointers as a synthetic cancelled touch event.
            if handler.config.needs_pointer_data && !handler.tracker.is_empty() {
                let flush = handler.cancelled_touches_event(rect);
                if let (Some(event), Some(dispatcher)) = (flush, handler.dispatcher.as_mut()) {
                    dispatcher.on_gesture_event(&GestureEvent::Touch(event));
                }
            }
        }

        self.on_handler_state_change(tag, new_state, old_state);
        self.with_recognizer(tag, |recognizer, _ctx| {
            recognizer.on_state_change(new_state, old_state);
        });

        if let Some(handler) = self.handlers.get_mut(tag)
            && !handler.is_enabled()
            && handler.state.is_terminal()
        {
            handler.state = State::Undetermined;
        }
    }

    /// Reset the handler to its initial per-gesture state.
    pub(crate) fn reset(&mut self, tag: HandlerTag) {
        self.with_recognizer(tag, |recognizer, _ctx| {
            recognizer.on_reset();
            recognizer.reset_progress();
        });
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.tracker.reset();
            handler.state = State::Undetermined;
            handler.deadline_nanos = None;
        }
    }

    fn reset_progress(&mut self, tag: HandlerTag) {
        self.with_recognizer(tag, |recognizer, _ctx| recognizer.reset_progress());
    }

    // ------------------------------------------------------------------
    // Touch delivery
    // ------------------------------------------------------------------

    pub(crate) fn on_pointer_down(&mut self, tag: HandlerTag, event: &PointerEvent) {
        self.record_handler_if_not_present(tag);
        let Some(handler) = self.handlers.get_mut(tag) else {
            return;
        };
        handler.pointer_type = event.pointer_type;
        handler
            .tracker
            .add(event.pointer_id, Point::new(event.x, event.y), event.time_nanos);
        if event.pointer_type == PointerType::Touch {
            self.cancel_mouse_and_pen_gestures(tag);
        }
        self.forward_touch_event(tag, event);
        self.with_recognizer(tag, |recognizer, ctx| {
            recognizer.on_pointer_down(ctx, event);
        });
    }

    pub(crate) fn on_additional_pointer_add(&mut self, tag: HandlerTag, event: &PointerEvent) {
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler
                .tracker
                .add(event.pointer_id, Point::new(event.x, event.y), event.time_nanos);
        }
        self.forward_touch_event(tag, event);
        self.with_recognizer(tag, |recognizer, ctx| {
            recognizer.on_additional_pointer_add(ctx, event);
        });
    }

    pub(crate) fn on_pointer_move(&mut self, tag: HandlerTag, event: &PointerEvent) {
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler
                .tracker
                .track_move(event.pointer_id, Point::new(event.x, event.y), event.time_nanos);
        }
        self.try_send_move_event(tag, false);
        self.forward_touch_event(tag, event);
        self.with_recognizer(tag, |recognizer, ctx| {
            recognizer.on_pointer_move(ctx, event);
        });
    }

    /// A move outside the view bounds, forwarded with out-of-bounds
    /// semantics: progress events are suppressed for handlers configured to
    /// cancel when outside.
    pub(crate) fn on_pointer_out_of_bounds(&mut self, tag: HandlerTag, event: &PointerEvent) {
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler
                .tracker
                .track_move(event.pointer_id, Point::new(event.x, event.y), event.time_nanos);
        }
        self.try_send_move_event(tag, true);
        self.forward_touch_event(tag, event);
        self.with_recognizer(tag, |recognizer, ctx| {
            recognizer.on_pointer_out_of_bounds(ctx, event);
        });
    }

    pub(crate) fn on_pointer_up(&mut self, tag: HandlerTag, event: &PointerEvent) {
        self.forward_touch_event(tag, event);
        self.with_recognizer(tag, |recognizer, ctx| {
            recognizer.on_pointer_up(ctx, event);
        });
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.tracker.remove(event.pointer_id);
        }
    }

    pub(crate) fn on_additional_pointer_remove(&mut self, tag: HandlerTag, event: &PointerEvent) {
        self.forward_touch_event(tag, event);
        self.with_recognizer(tag, |recognizer, ctx| {
            recognizer.on_additional_pointer_remove(ctx, event);
        });
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.tracker.remove(event.pointer_id);
        }
    }

    pub(crate) fn on_pointer_enter(&mut self, tag: HandlerTag, event: &PointerEvent) {
        self.forward_touch_event(tag, event);
    }

    /// A move that left the view bounds. Applies the
    /// `should_cancel_when_outside` policy: ACTIVE cancels, BEGAN fails,
    /// anything else forwards the touch data.
    pub(crate) fn on_pointer_out(&mut self, tag: HandlerTag, event: &PointerEvent) {
        let Some((should_cancel, state)) = self
            .handlers
            .get(tag)
            .map(|handler| (handler.should_cancel_when_outside, handler.state))
        else {
            return;
        };
        if should_cancel {
            match state {
                State::Active => self.cancel(tag),
                State::Began => self.fail(tag),
                _ => {}
            }
            return;
        }
        self.forward_touch_event(tag, event);
    }

    pub(crate) fn on_pointer_cancel(&mut self, tag: HandlerTag, event: &PointerEvent) {
        self.forward_touch_event(tag, event);
        self.cancel(tag);
        self.reset(tag);
    }

    /// Fire the recognizer's deadline hook.
    pub(crate) fn on_deadline(&mut self, tag: HandlerTag, now_nanos: u64) {
        self.with_recognizer(tag, |recognizer, ctx| {
            recognizer.on_deadline(ctx, now_nanos);
        });
    }

    /// Emit an ACTIVE progress event for a move, unless the pointer is out
    /// of bounds and the handler cancels when outside.
    fn try_send_move_event(&mut self, tag: HandlerTag, out_of_bounds: bool) {
        let rect = self.view_rect(tag);
        let Some(handler) = self.handlers.get_mut(tag) else {
            return;
        };
        if handler.is_enabled()
            && handler.is_activated
            && (!out_of_bounds || !handler.should_cancel_when_outside)
        {
            let state = handler.state;
            handler.send_event(state, state, rect);
        }
    }

    fn forward_touch_event(&mut self, tag: HandlerTag, event: &PointerEvent) {
        let rect = self.view_rect(tag);
        let Some(handler) = self.handlers.get_mut(tag) else {
            return;
        };
        if handler.config.needs_pointer_data {
            handler.send_touch_event(event, rect);
        }
    }

    /// Emit a state-change event pair through the handler's dispatcher.
    pub(crate) fn dispatch_state_change(
        &mut self,
        tag: HandlerTag,
        new_state: State,
        old_state: State,
    ) {
        let rect = self.view_rect(tag);
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.send_event(new_state, old_state, rect);
        }
    }

    /// Run a recognizer hook with the recognizer temporarily taken out of
    /// its handler slot, so the hook can re-enter the context.
    pub(crate) fn with_recognizer<F>(&mut self, tag: HandlerTag, f: F)
    where
        F: FnOnce(&mut Box<dyn Recognizer>, &mut RecognizerCtx<'_, '_>),
    {
        let Some(mut recognizer) = self
            .handlers
            .get_mut(tag)
            .and_then(|handler| handler.recognizer.take())
        else {
            return;
        };
        let mut ctx = RecognizerCtx::new(self, tag);
        f(&mut recognizer, &mut ctx);
        if let Some(handler) = self.handlers.get_mut(tag) {
            handler.recognizer = Some(recognizer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HitSlop;
    use crate::recognizers::create_recognizer;

    fn handler_with_slop(slop: Option<HitSlop>) -> GestureHandler {
        let mut handler =
            GestureHandler::new(1, create_recognizer("PanGestureHandler").unwrap());
        handler.config.hit_slop = slop;
        handler
    }

    #[test]
    fn test_hit_slop_left_expansion() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut handler = handler_with_slop(Some(HitSlop {
            left: Some(10.0),
            ..Default::default()
        }));

        handler.tracker.add(1, Point::new(-5.0, 50.0), 0);
        assert!(handler.is_within_hit_slop(rect));

        handler.tracker.track_move(1, Point::new(-15.0, 50.0), 1);
        assert!(!handler.is_within_hit_slop(rect));
    }

    #[test]
    fn test_hit_slop_defaults_to_pass() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut handler = handler_with_slop(None);
        handler.tracker.add(1, Point::new(500.0, 500.0), 0);
        // No slop configured: the router already guaranteed the down was
        // in bounds, so the handler does not re-test.
        assert!(handler.is_within_hit_slop(rect));
    }

    #[test]
    fn test_hit_slop_width_pins_right_edge() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut handler = handler_with_slop(Some(HitSlop {
            left: Some(0.0),
            width: Some(40.0),
            ..Default::default()
        }));

        handler.tracker.add(1, Point::new(30.0, 50.0), 0);
        assert!(handler.is_within_hit_slop(rect));
        handler.tracker.track_move(1, Point::new(60.0, 50.0), 1);
        assert!(!handler.is_within_hit_slop(rect));
    }

    #[test]
    fn test_hit_slop_vertical_contraction() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut handler = handler_with_slop(Some(HitSlop {
            vertical: Some(-20.0),
            ..Default::default()
        }));

        handler.tracker.add(1, Point::new(50.0, 10.0), 0);
        assert!(!handler.is_within_hit_slop(rect));
        handler.tracker.track_move(1, Point::new(50.0, 50.0), 1);
        assert!(handler.is_within_hit_slop(rect));
    }
}
