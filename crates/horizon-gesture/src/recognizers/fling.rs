//! Fling (quick swipe) recognition.
//!
//! Watches pointer velocity while the press is young; a velocity above the
//! threshold along one of the allowed directions recognizes the fling
//! (activate immediately followed by end). A deadline bounds how long the
//! gesture may take.

use crate::config::{ConfigUpdate, Directions, HandlerConfig};
use crate::event::PointerEvent;
use crate::state::State;

use super::{Recognizer, RecognizerCtx};

const DEFAULT_DIRECTION: Directions = Directions::RIGHT;
const DEFAULT_MAX_DURATION_MS: u64 = 800;
const DEFAULT_MIN_VELOCITY: f32 = 700.0;

const NANOS_PER_MS: u64 = 1_000_000;

/// Discrete swipe recognizer.
#[derive(Debug, Default)]
pub struct FlingRecognizer;

impl FlingRecognizer {
    fn velocity_matches(config: &HandlerConfig, vx: f32, vy: f32) -> bool {
        let direction = config.direction.unwrap_or(DEFAULT_DIRECTION);
        let min_velocity = config.min_velocity.unwrap_or(DEFAULT_MIN_VELOCITY);

        (direction.contains(Directions::RIGHT) && vx >= min_velocity)
            || (direction.contains(Directions::LEFT) && -vx >= min_velocity)
            || (direction.contains(Directions::DOWN) && vy >= min_velocity)
            || (direction.contains(Directions::UP) && -vy >= min_velocity)
    }
}

impl Recognizer for FlingRecognizer {
    fn kind(&self) -> &'static str {
        "FlingGestureHandler"
    }

    fn default_config(&self) -> HandlerConfig {
        let mut config = HandlerConfig::enabled_default();
        config.apply(&ConfigUpdate {
            direction: Some(DEFAULT_DIRECTION),
            max_duration_ms: Some(DEFAULT_MAX_DURATION_MS),
            ..Default::default()
        });
        config
    }

    fn on_pointer_down(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        ctx.begin();
        let max_duration = ctx
            .config()
            .max_duration_ms
            .unwrap_or(DEFAULT_MAX_DURATION_MS);
        ctx.set_deadline(event.time_nanos + max_duration * NANOS_PER_MS);
    }

    fn on_pointer_move(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        if ctx.state() != State::Began {
            return;
        }
        let Some((vx, vy)) = ctx.velocity_of(event.pointer_id) else {
            return;
        };
        if Self::velocity_matches(&ctx.config(), vx, vy) {
            ctx.clear_deadline();
            ctx.activate();
            ctx.end();
        }
    }

    fn on_deadline(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _now_nanos: u64) {
        // Took too long to build up velocity.
        ctx.fail();
    }

    fn on_pointer_up(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _event: &PointerEvent) {
        if ctx.state() == State::Began {
            ctx.fail();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_respects_direction_mask() {
        let config = FlingRecognizer.default_config();
        // Default direction is RIGHT.
        assert!(FlingRecognizer::velocity_matches(&config, 800.0, 0.0));
        assert!(!FlingRecognizer::velocity_matches(&config, -800.0, 0.0));
        assert!(!FlingRecognizer::velocity_matches(&config, 0.0, 800.0));
    }

    #[test]
    fn test_combined_directions() {
        let mut config = FlingRecognizer.default_config();
        config.direction = Some(Directions(Directions::UP.0 | Directions::DOWN.0));
        assert!(FlingRecognizer::velocity_matches(&config, 0.0, 900.0));
        assert!(FlingRecognizer::velocity_matches(&config, 0.0, -900.0));
        assert!(!FlingRecognizer::velocity_matches(&config, 900.0, 0.0));
    }

    #[test]
    fn test_min_velocity_override() {
        let mut config = FlingRecognizer.default_config();
        config.min_velocity = Some(100.0);
        assert!(FlingRecognizer::velocity_matches(&config, 150.0, 0.0));
        assert!(!FlingRecognizer::velocity_matches(&config, 50.0, 0.0));
    }
}
