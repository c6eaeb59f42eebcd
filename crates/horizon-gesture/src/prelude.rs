//! Convenient re-exports for embedding the engine.
//!
//! ```
//! use horizon_gesture::prelude::*;
//! ```

pub use crate::config::{ConfigUpdate, Directions, HandlerConfig, HitSlop};
pub use crate::dispatch::{DeliveryChannel, EventDispatcher, EventDispatcherFactory};
pub use crate::engine::GestureEngine;
pub use crate::error::{GestureError, GestureResult};
pub use crate::event::{
    GestureEvent, GestureTouchEvent, RawTouchEvent, RawTouchPoint, RawTouchableView,
    StateChangeEvent, Touch,
};
pub use crate::recognizers::{Recognizer, RecognizerCtx};
pub use crate::state::State;
pub use horizon_gesture_core::{HandlerTag, Point, PointerId, PointerType, Rect, TouchId, ViewTag};
