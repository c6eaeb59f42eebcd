//! Tap and multi-tap recognition.
//!
//! Begins on the first pointer-down, counts taps on pointer-up, and
//! activates (then immediately ends) once the configured tap count is
//! reached. Deadlines bound both the duration of a single press and the
//! delay between consecutive taps.

use horizon_gesture_core::Point;

use crate::config::{ConfigUpdate, HandlerConfig, DEFAULT_TOUCH_SLOP};
use crate::event::PointerEvent;
use crate::state::State;

use super::{Recognizer, RecognizerCtx};

const DEFAULT_NUMBER_OF_TAPS: u32 = 1;
const DEFAULT_MAX_DURATION_MS: u64 = 500;
const DEFAULT_MAX_DELAY_MS: u64 = 500;

const NANOS_PER_MS: u64 = 1_000_000;

/// Discrete tap recognizer.
#[derive(Debug, Default)]
pub struct TapRecognizer {
    taps_so_far: u32,
    /// Down position of the current press.
    press_start: Point,
}

impl TapRecognizer {
    fn moved_too_far(&self, config: &HandlerConfig, position: Point) -> bool {
        let dx = position.x - self.press_start.x;
        let dy = position.y - self.press_start.y;
        if let Some(max_dx) = config.max_delta_x
            && dx.abs() > max_dx
        {
            return true;
        }
        if let Some(max_dy) = config.max_delta_y
            && dy.abs() > max_dy
        {
            return true;
        }
        let max_dist = config.max_dist.unwrap_or(DEFAULT_TOUCH_SLOP);
        dx.hypot(dy) > max_dist
    }
}

impl Recognizer for TapRecognizer {
    fn kind(&self) -> &'static str {
        "TapGestureHandler"
    }

    fn default_config(&self) -> HandlerConfig {
        let mut config = HandlerConfig::enabled_default();
        config.apply(&ConfigUpdate {
            number_of_taps: Some(DEFAULT_NUMBER_OF_TAPS),
            max_duration_ms: Some(DEFAULT_MAX_DURATION_MS),
            max_delay_ms: Some(DEFAULT_MAX_DELAY_MS),
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
        let max_duration = ctx
            .config()
            .max_duration_ms
            .unwrap_or(DEFAULT_MAX_DURATION_MS);
        ctx.set_deadline(event.time_nanos + max_duration * NANOS_PER_MS);
    }

    fn on_pointer_move(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        if self.moved_too_far(&ctx.config(), Point::new(event.x, event.y)) {
            ctx.fail();
        }
    }

    fn on_pointer_out_of_bounds(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        self.on_pointer_move(ctx, event);
    }

    fn on_pointer_up(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        if ctx.state() != State::Began {
            return;
        }
        self.taps_so_far += 1;
        let config = ctx.config();
        if self.taps_so_far >= config.number_of_taps.unwrap_or(DEFAULT_NUMBER_OF_TAPS) {
            ctx.clear_deadline();
            ctx.activate();
            ctx.end();
        } else {
            // Wait for the next tap of the series.
            let max_delay = config.max_delay_ms.unwrap_or(DEFAULT_MAX_DELAY_MS);
            ctx.set_deadline(event.time_nanos + max_delay * NANOS_PER_MS);
        }
    }

    fn on_deadline(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _now_nanos: u64) {
        ctx.fail();
    }

    fn reset_progress(&mut self) {
        self.taps_so_far = 0;
        self.press_start = Point::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_slop() {
        let mut tap = TapRecognizer::default();
        tap.press_start = Point::new(100.0, 100.0);
        let config = tap.default_config();

        assert!(!tap.moved_too_far(&config, Point::new(105.0, 100.0)));
        assert!(tap.moved_too_far(&config, Point::new(100.0 + DEFAULT_TOUCH_SLOP + 1.0, 100.0)));
    }

    #[test]
    fn test_max_delta_overrides() {
        let mut tap = TapRecognizer::default();
        tap.press_start = Point::ZERO;
        let mut config = tap.default_config();
        config.max_delta_x = Some(2.0);
        assert!(tap.moved_too_far(&config, Point::new(3.0, 0.0)));
        assert!(!tap.moved_too_far(&config, Point::new(1.0, 0.0)));
    }
}
