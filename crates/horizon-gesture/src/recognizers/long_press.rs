//! Long-press recognition.
//!
//! Begins on pointer-down and activates once the press has been held for
//! the configured minimum duration without drifting past the movement
//! limit. The duration is measured by a parked deadline the host clock
//! fires through the engine.

use horizon_gesture_core::Point;

use crate::config::{ConfigUpdate, HandlerConfig};
use crate::event::PointerEvent;
use crate::state::State;

use super::{Recognizer, RecognizerCtx};

const DEFAULT_MIN_DURATION_MS: u64 = 500;
const DEFAULT_MAX_DIST: f32 = 10.0;

const NANOS_PER_MS: u64 = 1_000_000;

/// Press-and-hold recognizer.
#[derive(Debug, Default)]
pub struct LongPressRecognizer {
    press_start: Point,
}

impl Recognizer for LongPressRecognizer {
    fn kind(&self) -> &'static str {
        "LongPressGestureHandler"
    }

    fn default_config(&self) -> HandlerConfig {
        let mut config = HandlerConfig::enabled_default();
        config.apply(&ConfigUpdate {
            min_duration_ms: Some(DEFAULT_MIN_DURATION_MS),
            max_dist: Some(DEFAULT_MAX_DIST),
            ..Default::default()
        });
        config
    }

    fn default_should_cancel_when_outside(&self) -> bool {
        true
    }

    fn on_pointer_down(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        self.press_start = Point::new(event.x, event.y);
        ctx.begin();
        let min_duration = ctx
            .config()
            .min_duration_ms
            .unwrap_or(DEFAULT_MIN_DURATION_MS);
        ctx.set_deadline(event.time_nanos + min_duration * NANOS_PER_MS);
    }

    fn on_pointer_move(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        let max_dist = ctx.config().max_dist.unwrap_or(DEFAULT_MAX_DIST);
        let drift = self.press_start.distance_to(Point::new(event.x, event.y));
        if drift > max_dist {
            ctx.fail();
        }
    }

    fn on_deadline(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _now_nanos: u64) {
        // Held long enough.
        ctx.activate();
    }

    fn on_pointer_up(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _event: &PointerEvent) {
        if ctx.state() == State::Active {
            ctx.end();
        } else {
            ctx.fail();
        }
    }

    fn reset_progress(&mut self) {
        self.press_start = Point::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let recognizer = LongPressRecognizer::default();
        let config = recognizer.default_config();
        assert_eq!(config.min_duration_ms, Some(DEFAULT_MIN_DURATION_MS));
        assert_eq!(config.max_dist, Some(DEFAULT_MAX_DIST));
        assert!(recognizer.default_should_cancel_when_outside());
    }
}
