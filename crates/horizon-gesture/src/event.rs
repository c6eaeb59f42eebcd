//! Event model: raw platform input, adapted per-handler events, and the
//! outgoing records delivered to the host.
//!
//! Three layers, in processing order:
//!
//! 1. [`RawTouchEvent`]: what the platform capture layer reports for a
//!    gesture root, with an action code, the changed touch, all touches
//!    currently down, and the touchable views under the action point.
//! 2. [`PointerEvent`]: the per-handler event synthesized by the view
//!    router, classified into an [`EventType`] from the touch type and the
//!    pointer's bounds transitions.
//! 3. [`StateChangeEvent`] / [`GestureTouchEvent`]: the records the engine
//!    emits to the host bridge through a delivery channel.

use horizon_gesture_core::{HandlerTag, PointerId, PointerType, Rect, TouchId, ViewTag};
use serde::Serialize;

use crate::error::GestureError;
use crate::state::State;

/// The phase of a raw touch event, decoded from the platform action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    /// A pointer made contact.
    Down,
    /// A pointer moved.
    Move,
    /// A pointer lifted.
    Up,
    /// The platform aborted the touch sequence.
    Cancel,
}

impl TouchAction {
    /// Decode a raw platform action code.
    ///
    /// Unknown codes are an error for the single event carrying them; the
    /// session continues with the next event.
    pub fn from_code(code: u32) -> Result<Self, GestureError> {
        match code {
            0 => Ok(Self::Cancel),
            1 => Ok(Self::Down),
            2 => Ok(Self::Move),
            3 => Ok(Self::Up),
            other => Err(GestureError::UnknownTouchPhase(other)),
        }
    }
}

/// A single pointer position within a raw touch event, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTouchPoint {
    /// Raw platform pointer id.
    pub pointer_id: PointerId,
    pub window_x: f32,
    pub window_y: f32,
}

/// A touchable view reported under the action point, root to leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTouchableView {
    /// Host view tag.
    pub tag: ViewTag,
    /// Bounding box relative to the application window.
    pub frame: Rect,
    /// Whether the view carries a button accessibility role.
    pub has_button_role: bool,
}

/// A raw multi-touch event for one gesture root.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTouchEvent {
    /// Platform action code; see [`TouchAction::from_code`].
    pub action: u32,
    /// The pointer this event is about.
    pub action_touch: RawTouchPoint,
    /// Every pointer currently down, including `action_touch`.
    pub touch_points: Vec<RawTouchPoint>,
    /// Platform source-type code; see [`PointerType::from_source_code`].
    pub source_type: u32,
    /// Event timestamp in nanoseconds.
    pub timestamp_nanos: u64,
    /// Touchable views containing the action point, ordered root to leaf.
    pub touchable_views: Vec<RawTouchableView>,
}

/// The per-handler event classification produced by the view router.
///
/// `Down`/`Up` describe the first/last pointer of a sequence on a view;
/// the `AdditionalPointer*` variants describe 2nd and later simultaneous
/// fingers. `Enter`/`Out` are synthesized from bounds transitions on move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Down,
    AdditionalPointerDown,
    Up,
    AdditionalPointerUp,
    Move,
    Enter,
    Out,
    Cancel,
}

/// The touch phase reported in outgoing [`GestureTouchEvent`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchPhase {
    Undetermined,
    Down,
    Move,
    Up,
    Cancelled,
}

impl TouchPhase {
    /// The outgoing phase corresponding to a raw touch action.
    pub fn from_action(action: TouchAction) -> Self {
        match action {
            TouchAction::Down => Self::Down,
            TouchAction::Move => Self::Move,
            TouchAction::Up => Self::Up,
            TouchAction::Cancel => Self::Cancelled,
        }
    }
}

/// An event adapted for delivery to a single handler.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in window coordinates.
    pub x: f32,
    pub y: f32,
    /// Pointer position relative to the handler's view.
    pub offset_x: f32,
    pub offset_y: f32,
    /// Raw platform pointer id.
    pub pointer_id: PointerId,
    pub event_type: EventType,
    pub pointer_type: PointerType,
    /// Event timestamp in nanoseconds.
    pub time_nanos: u64,
    /// Every pointer currently down, in window coordinates.
    pub touch_points: Vec<RawTouchPoint>,
    /// The outgoing phase this event maps to.
    pub touch_phase: TouchPhase,
}

/// Per-pointer data in an outgoing touch event.
///
/// `id` is the stable mapped touch id, not the raw platform pointer id, so
/// consumers can follow "the same finger" across events even when the
/// platform recycles pointer ids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Touch {
    pub id: TouchId,
    /// Position relative to the handler's view.
    pub x: f32,
    pub y: f32,
    /// Position in window coordinates.
    pub absolute_x: f32,
    pub absolute_y: f32,
}

/// A handler state transition reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangeEvent {
    pub handler_tag: HandlerTag,
    /// The view the handler is attached to.
    pub target: ViewTag,
    pub state: State,
    /// The previous state, omitted for ACTIVE progress events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_state: Option<State>,
    pub number_of_pointers: usize,
    /// Whether the pointer centroid is inside the view bounds.
    pub pointer_inside: bool,
    /// Centroid position relative to the handler's view.
    pub x: f32,
    pub y: f32,
    /// Centroid position in window coordinates.
    pub absolute_x: f32,
    pub absolute_y: f32,
}

/// Raw per-pointer data forwarded to handlers that asked for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureTouchEvent {
    pub handler_tag: HandlerTag,
    pub state: State,
    pub phase: TouchPhase,
    pub changed_touches: Vec<Touch>,
    pub all_touches: Vec<Touch>,
    pub number_of_touches: usize,
}

/// An event delivered on the gesture-event channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GestureEvent {
    /// Continuous progress while a handler is ACTIVE.
    Update(StateChangeEvent),
    /// Raw pointer data for handlers with `needs_pointer_data`.
    Touch(GestureTouchEvent),
}
