//! Core types for Horizon Gesture.
//!
//! This crate provides the foundational, policy-free building blocks shared
//! by the gesture engine:
//!
//! - **Geometry**: `Point` and `Rect` in the shared window coordinate space
//! - **Identifiers**: opaque tags for handlers, views, pointers and touches
//! - **Diagnostics**: tracing targets and a scoped span guard
//!
//! Everything here is deliberately inert: no component in this crate makes
//! arbitration decisions or owns gesture state.
//!
//! # Example
//!
//! ```
//! use horizon_gesture_core::{Point, Rect};
//!
//! let view = Rect::new(0.0, 0.0, 100.0, 100.0);
//! assert!(view.contains(Point::new(50.0, 50.0)));
//! assert!(view.contains(Point::new(100.0, 100.0))); // edges count as inside
//! ```

pub mod diagnostics;
mod geometry;
mod ids;

pub use geometry::{Point, Rect};
pub use ids::{HandlerTag, PointerId, PointerType, TouchId, ViewTag};
