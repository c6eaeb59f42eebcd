//! Pan (drag) recognition.
//!
//! Begins on pointer-down and activates once the pointer centroid travels
//! past the configured activation thresholds: a minimum distance, explicit
//! per-axis active offsets, or a minimum velocity. Explicit fail offsets
//! bound the gesture the other way.

use horizon_gesture_core::Point;

use crate::config::{ConfigUpdate, HandlerConfig, DEFAULT_TOUCH_SLOP};
use crate::event::PointerEvent;
use crate::state::State;

use super::{Recognizer, RecognizerCtx};

const DEFAULT_MIN_POINTERS: usize = 1;
const DEFAULT_MAX_POINTERS: usize = 10;

/// Continuous drag recognizer.
#[derive(Debug, Default)]
pub struct PanRecognizer {
    /// Centroid at gesture start, adjusted when pointers come and go.
    start: Point,
    /// Translation carried over across pointer-count changes.
    offset: Point,
    /// Centroid at the most recent event.
    last_average: Point,
}

impl PanRecognizer {
    fn translation(&self) -> Point {
        Point::new(
            self.last_average.x - self.start.x + self.offset.x,
            self.last_average.y - self.start.y + self.offset.y,
        )
    }

    fn min_pointers(config: &HandlerConfig) -> usize {
        config.min_pointers.unwrap_or(DEFAULT_MIN_POINTERS)
    }

    fn max_pointers(config: &HandlerConfig) -> usize {
        config.max_pointers.unwrap_or(DEFAULT_MAX_POINTERS)
    }

    fn should_fail(&self, config: &HandlerConfig) -> bool {
        let t = self.translation();
        if let Some(limit) = config.fail_offset_x_start
            && t.x < limit
        {
            return true;
        }
        if let Some(limit) = config.fail_offset_x_end
            && t.x > limit
        {
            return true;
        }
        if let Some(limit) = config.fail_offset_y_start
            && t.y < limit
        {
            return true;
        }
        if let Some(limit) = config.fail_offset_y_end
            && t.y > limit
        {
            return true;
        }
        false
    }

    fn should_activate(&self, config: &HandlerConfig, velocity: Option<(f32, f32)>) -> bool {
        let t = self.translation();

        if let Some(limit) = config.active_offset_x_start
            && t.x < limit
        {
            return true;
        }
        if let Some(limit) = config.active_offset_x_end
            && t.x > limit
        {
            return true;
        }
        if let Some(limit) = config.active_offset_y_start
            && t.y < limit
        {
            return true;
        }
        if let Some(limit) = config.active_offset_y_end
            && t.y > limit
        {
            return true;
        }

        let has_offsets = config.active_offset_x_start.is_some()
            || config.active_offset_x_end.is_some()
            || config.active_offset_y_start.is_some()
            || config.active_offset_y_end.is_some();
        let min_dist = config
            .min_dist
            .unwrap_or(if has_offsets { f32::INFINITY } else { DEFAULT_TOUCH_SLOP });
        if t.x.hypot(t.y) >= min_dist {
            return true;
        }

        if let Some((vx, vy)) = velocity {
            if let Some(min) = config.min_velocity
                && vx.hypot(vy) >= min
            {
                return true;
            }
            if let Some(min) = config.min_velocity_x
                && vx.abs() >= min
            {
                return true;
            }
            if let Some(min) = config.min_velocity_y
                && vy.abs() >= min
            {
                return true;
            }
        }
        false
    }

    fn check_criteria(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        self.last_average = ctx.average_position();
        if ctx.state() != State::Began {
            return;
        }
        let config = ctx.config();
        if self.should_fail(&config) {
            ctx.fail();
        } else if self.should_activate(&config, ctx.velocity_of(event.pointer_id)) {
            ctx.activate();
        }
    }

    /// Keep the translation continuous when the pointer set changes.
    fn rebase(&mut self, ctx: &RecognizerCtx<'_, '_>) {
        let new_average = ctx.average_position();
        self.offset.x += self.last_average.x - new_average.x;
        self.offset.y += self.last_average.y - new_average.y;
        self.last_average = new_average;
    }
}

impl Recognizer for PanRecognizer {
    fn kind(&self) -> &'static str {
        "PanGestureHandler"
    }

    fn is_continuous(&self) -> bool {
        true
    }

    fn default_config(&self) -> HandlerConfig {
        let mut config = HandlerConfig::enabled_default();
        config.apply(&ConfigUpdate {
            min_pointers: Some(DEFAULT_MIN_POINTERS),
            max_pointers: Some(DEFAULT_MAX_POINTERS),
            ..Default::default()
        });
        config
    }

    fn on_pointer_down(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _event: &PointerEvent) {
        self.start = ctx.average_position();
        self.last_average = self.start;
        self.offset = Point::ZERO;
        if ctx.pointer_count() >= Self::min_pointers(&ctx.config()) {
            ctx.begin();
        }
    }

    fn on_additional_pointer_add(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _event: &PointerEvent) {
        self.rebase(ctx);
        let config = ctx.config();
        if ctx.pointer_count() > Self::max_pointers(&config) {
            ctx.fail();
            return;
        }
        if ctx.pointer_count() >= Self::min_pointers(&config) {
            ctx.begin();
        }
    }

    fn on_pointer_move(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        self.check_criteria(ctx, event);
    }

    fn on_pointer_out_of_bounds(&mut self, ctx: &mut RecognizerCtx<'_, '_>, event: &PointerEvent) {
        self.check_criteria(ctx, event);
    }

    fn on_pointer_up(&mut self, ctx: &mut RecognizerCtx<'_, '_>, _event: &PointerEvent) {
        // The lifting pointer is still tracked while this hook runs.
        let remaining = ctx.pointer_count().saturating_sub(1);
        if remaining > 0 {
            return;
        }
        match ctx.state() {
            State::Active => ctx.end(),
            State::Began => ctx.fail(),
            _ => {}
        }
    }

    fn on_additional_pointer_remove(
        &mut self,
        ctx: &mut RecognizerCtx<'_, '_>,
        _event: &PointerEvent,
    ) {
        self.rebase(ctx);
        let remaining = ctx.pointer_count().saturating_sub(1);
        let min_pointers = Self::min_pointers(&ctx.config());
        if remaining < min_pointers {
            match ctx.state() {
                State::Active => ctx.end(),
                State::Began => ctx.fail(),
                _ => {}
            }
        }
    }

    fn reset_progress(&mut self) {
        self.start = Point::ZERO;
        self.offset = Point::ZERO;
        self.last_average = Point::ZERO;
    }
}
