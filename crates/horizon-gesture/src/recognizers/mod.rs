//! Recognizer families and the shared state-machine contract.
//!
//! Every gesture family implements the flat [`Recognizer`] trait; there is
//! no hierarchy beyond it. A recognizer owns only its family-specific
//! progress (tap counts, accumulated translation); lifecycle state,
//! configuration and pointer tracking live on the handler record, reached
//! through the [`RecognizerCtx`] passed into every hook.
//!
//! Concrete families are selected by [`create_recognizer`], keyed on the
//! handler-kind name the host supplies at creation time.

use horizon_gesture_core::{HandlerTag, Point, PointerId, Rect};

use crate::config::HandlerConfig;
use crate::error::{GestureError, GestureResult};
use crate::event::PointerEvent;
use crate::handler::EngineCtx;
use crate::state::State;

mod fling;
mod long_press;
mod manual;
mod pan;
mod tap;

pub use fling::FlingRecognizer;
pub use long_press::LongPressRecognizer;
pub use manual::ManualRecognizer;
pub use pan::PanRecognizer;
pub use tap::TapRecognizer;

/// The per-family recognition contract.
///
/// Hooks run synchronously during event processing with the recognizer
/// temporarily detached from its handler; transitions requested through the
/// context apply immediately, including their arbitration side effects.
pub trait Recognizer: Send {
    /// The factory name of this family.
    fn kind(&self) -> &'static str;

    /// Whether the gesture reports continuous progress while active.
    fn is_continuous(&self) -> bool {
        false
    }

    /// The configuration this family starts from before host updates.
    fn default_config(&self) -> HandlerConfig {
        HandlerConfig::enabled_default()
    }

    /// Default for the cancel-when-outside policy when the host config
    /// leaves it unset.
    fn default_should_cancel_when_outside(&self) -> bool {
        false
    }

    /// A global opt-out of exclusive arbitration: the handler recognizes
    /// simultaneously with everyone, no declared relation required.
    fn prefers_simultaneous_recognition(&self) -> bool {
        false
    }

    fn on_pointer_down(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        let _ = (ctx, event);
    }

    fn on_additional_pointer_add(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        let _ = (ctx, event);
    }

    fn on_pointer_move(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        let _ = (ctx, event);
    }

    /// A move while every pointer is outside the view bounds.
    fn on_pointer_out_of_bounds(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        let _ = (ctx, event);
    }

    fn on_pointer_up(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        let _ = (ctx, event);
    }

    fn on_additional_pointer_remove(
        &mut self,
        ctx: &mut RecognizerCtx<'_, '_>,
        event: &PointerEvent,
    ) {
        let _ = (ctx, event);
    }

    /// A deadline parked through [`RecognizerCtx::set_deadline`] fired.
    fn on_deadline(&mut self, ctx: &mut RecognizerCtx<'_, '_>, now_nanos: u64) {
        let _ = (ctx, now_nanos);
    }

    /// Observe a completed state transition.
    fn on_state_change(&mut self, new_state: State, old_state: State) {
        let _ = (new_state, old_state);
    }

    /// Runs before a cancel transition, while tracked pointers are intact.
    fn on_cancel(&mut self, ctx: &mut RecognizerCtx<'_, '_>) {
        let _ = ctx;
    }

    /// The handler is being reset for the next gesture.
    fn on_reset(&mut self) {}

    /// Drop family-specific progress.
    fn reset_progress(&mut self) {}
}

impl core::fmt::Debug for dyn Recognizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Recognizer")
            .field("kind", &self.kind())
            .finish()
    }
}

/// The view a recognizer hook gets of its own handler and the engine.
pub struct RecognizerCtx<'e, 'a> {
    engine: &'e mut EngineCtx<'a>,
    tag: HandlerTag,
}

impl<'e, 'a> RecognizerCtx<'e, 'a> {
    pub(crate) fn new(engine: &'e mut EngineCtx<'a>, tag: HandlerTag) -> Self {
        Self { engine, tag }
    }

    /// The handler's current lifecycle state.
    pub fn state(&self) -> State {
        self.engine
            .handlers
            .get(self.tag)
            .map_or(State::Undetermined, |handler| handler.state)
    }

    /// A copy of the handler's resolved configuration.
    pub fn config(&self) -> HandlerConfig {
        self.engine
            .handlers
            .get(self.tag)
            .map(|handler| handler.config.clone())
            .unwrap_or_default()
    }

    /// Number of pointers currently tracked for this handler.
    pub fn pointer_count(&self) -> usize {
        self.engine
            .handlers
            .get(self.tag)
            .map_or(0, |handler| handler.tracker.count())
    }

    /// Centroid of the tracked pointers, window coordinates.
    pub fn average_position(&self) -> Point {
        self.engine
            .handlers
            .get(self.tag)
            .map_or(Point::ZERO, |handler| handler.tracker.average_position())
    }

    /// Centroid of the tracked pointers' down positions.
    pub fn average_start_position(&self) -> Point {
        self.engine
            .handlers
            .get(self.tag)
            .map_or(Point::ZERO, |handler| {
                handler.tracker.average_start_position()
            })
    }

    /// Velocity of one tracked pointer in window units per second.
    pub fn velocity_of(&self, pointer_id: PointerId) -> Option<(f32, f32)> {
        self.engine
            .handlers
            .get(self.tag)
            .and_then(|handler| handler.tracker.velocity_of(pointer_id))
    }

    /// Bounding box of the attached view.
    pub fn view_rect(&self) -> Rect {
        self.engine.view_rect(self.tag)
    }

    /// Request UNDETERMINED → BEGAN.
    pub fn begin(&mut self) {
        self.engine.begin(self.tag);
    }

    /// Request promotion to ACTIVE.
    ///
    /// Suppressed for manual-activation handlers, which only activate
    /// through explicit external promotion.
    pub fn activate(&mut self) {
        let manual = self
            .engine
            .handlers
            .get(self.tag)
            .is_some_and(|handler| handler.config.manual_activation);
        if manual {
            return;
        }
        self.engine.activate(self.tag);
    }

    /// Request a transition to FAILED.
    pub fn fail(&mut self) {
        self.engine.fail(self.tag);
    }

    /// Request a transition to CANCELLED.
    pub fn cancel(&mut self) {
        self.engine.cancel(self.tag);
    }

    /// Request a transition to END.
    pub fn end(&mut self) {
        self.engine.end(self.tag);
    }

    /// Park a deadline; the host clock fires it through the engine.
    pub fn set_deadline(&mut self, at_nanos: u64) {
        if let Some(handler) = self.engine.handlers.get_mut(self.tag) {
            handler.deadline_nanos = Some(at_nanos);
        }
    }

    /// Clear a parked deadline.
    pub fn clear_deadline(&mut self) {
        if let Some(handler) = self.engine.handlers.get_mut(self.tag) {
            handler.deadline_nanos = None;
        }
    }
}

/// Create a recognizer by its handler-kind name.
///
/// The names are the ones the host protocol uses when creating handlers.
pub fn create_recognizer(kind: &str) -> GestureResult<Box<dyn Recognizer>> {
    match kind {
        "TapGestureHandler" => Ok(Box::new(TapRecognizer::default())),
        "PanGestureHandler" => Ok(Box::new(PanRecognizer::default())),
        "LongPressGestureHandler" => Ok(Box::new(LongPressRecognizer::default())),
        "FlingGestureHandler" => Ok(Box::new(FlingRecognizer::default())),
        "ManualGestureHandler" => Ok(Box::new(ManualRecognizer::default())),
        other => Err(GestureError::UnknownHandlerKind(other.to_string())),
    }
}
