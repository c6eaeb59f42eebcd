//! Manual gesture recognition.
//!
//! The manual recognizer begins on pointer-down and then does nothing on
//! its own: activation, failure and completion are driven entirely by the
//! host through external state forcing. Typically combined with
//! `needs_pointer_data` so the host sees the raw touch stream.

use crate::event::PointerEvent;

use super::{Recognizer, RecognizerCtx};

/// Externally driven recognizer.
#[derive(Debug, Default)]
pub struct ManualRecognizer;

impl Recognizer for ManualRecognizer {
    fn kind(&self) -> &'static str {
        "ManualGestureHandler"
    }

    fn is_continuous(&self) -> bool {
        true
    }

    fn on_pointer_down(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _event: &PointerEvent) {
        ctx.begin();
    }
}
