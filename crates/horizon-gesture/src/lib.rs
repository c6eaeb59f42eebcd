//! Horizon Gesture - multi-touch gesture recognition and arbitration.
//!
//! This crate recognizes discrete and continuous touch gestures (taps,
//! pans, long-presses, flings) from a stream of raw multi-touch pointer
//! events, and arbitrates which of several competing recognizers, attached
//! to possibly overlapping and possibly nested views, wins a given touch
//! sequence.
//!
//! The host embeds the engine behind three narrow interfaces: it feeds raw
//! touch events per gesture root, supplies view geometry with each event,
//! and receives recognized gesture events through dispatcher objects it
//! creates itself. Everything in between lives here: per-handler state
//! machines, waitFor/block/simultaneous relations, hit-testing with
//! hit-slop, and the child-before-parent routing policy.
//!
//! # Example
//!
//! ```
//! use horizon_gesture::dispatch::RecordingDispatcherFactory;
//! use horizon_gesture::{ConfigUpdate, DeliveryChannel, GestureEngine};
//!
//! let factory = RecordingDispatcherFactory::new();
//! let mut engine = GestureEngine::new(Box::new(factory));
//!
//! engine.create_root(1);
//! engine
//!     .create_handler("PanGestureHandler", 10, &ConfigUpdate::default())
//!     .unwrap();
//! engine
//!     .attach_to_view(10, 100, DeliveryChannel::AnimationDriver)
//!     .unwrap();
//! // Feed engine.handle_touch(1, &raw_event) from the platform capture
//! // layer and drive engine.advance_time(now) from the host clock.
//! ```
//!
//! # Processing model
//!
//! Single-threaded and event-driven: all touch events for a root are
//! processed synchronously, one at a time, in arrival order. Cancellation
//! is explicit and synchronous; arbitration is a sequential pass over the
//! handlers in play, ordered by activation index, which makes resolution
//! deterministic and replayable from a recorded event log.

pub use horizon_gesture_core::{
    diagnostics, HandlerTag, Point, PointerId, PointerType, Rect, TouchId, ViewTag,
};

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod interaction;
pub mod prelude;
pub mod recognizers;
pub mod state;
pub mod tracker;

mod engine;
mod handler;
mod orchestrator;
mod registry;
mod router;

pub use config::{ConfigUpdate, Directions, HandlerConfig, HitSlop};
pub use dispatch::{DeliveryChannel, EventDispatcher, EventDispatcherFactory};
pub use engine::GestureEngine;
pub use error::{GestureError, GestureResult};
pub use event::{RawTouchEvent, RawTouchPoint, RawTouchableView};
pub use state::State;
