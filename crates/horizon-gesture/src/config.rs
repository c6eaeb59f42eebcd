//! Handler configuration: the sparse option record supplied by the host.
//!
//! Configuration arrives over the bridge as a sparse camelCase record
//! ([`ConfigUpdate`]); options the record leaves unset retain their previous
//! values. Each recognizer family seeds a [`HandlerConfig`] with its own
//! defaults before the first update is applied.

use horizon_gesture_core::HandlerTag;
use serde::Deserialize;

use crate::error::{GestureError, GestureResult};

/// Default movement slop in window units, shared by recognizers that fail a
/// gesture once the pointer travels too far.
pub const DEFAULT_TOUCH_SLOP: f32 = 15.0;

/// Per-side expansion (positive) or contraction (negative) of a view's
/// bounding box for hit-testing.
///
/// Explicit side values take precedence over the symmetric
/// `horizontal`/`vertical` shorthands; `width`/`height` reinterpret one pair
/// of sides relative to the other (e.g. `left` + `width` pins the right edge
/// at `left + width`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HitSlop {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub horizontal: Option<f32>,
    pub vertical: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// A bitmask of allowed gesture directions.
///
/// The bit values are part of the configuration protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Directions(pub u32);

impl Directions {
    pub const RIGHT: Self = Self(1);
    pub const LEFT: Self = Self(2);
    pub const UP: Self = Self(4);
    pub const DOWN: Self = Self(8);

    /// Whether every direction bit of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no direction is allowed.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// The resolved option record owned by a handler.
///
/// Threshold options are `None` until a recognizer default or a host update
/// provides them; recognizers fall back to their own constants for options
/// that stay unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandlerConfig {
    /// Disabled handlers ignore touches and emit nothing. Defaults to true.
    pub enabled: bool,
    /// Manual-activation handlers require explicit external promotion and
    /// never self-activate past BEGAN.
    pub manual_activation: bool,
    /// Whether the handler wants raw per-pointer touch events.
    pub needs_pointer_data: bool,
    pub should_cancel_when_outside: Option<bool>,
    pub hit_slop: Option<HitSlop>,
    pub min_pointers: Option<usize>,
    pub max_pointers: Option<usize>,
    pub min_dist: Option<f32>,
    pub max_dist: Option<f32>,
    pub min_velocity: Option<f32>,
    pub min_velocity_x: Option<f32>,
    pub min_velocity_y: Option<f32>,
    pub active_offset_x_start: Option<f32>,
    pub active_offset_x_end: Option<f32>,
    pub active_offset_y_start: Option<f32>,
    pub active_offset_y_end: Option<f32>,
    pub fail_offset_x_start: Option<f32>,
    pub fail_offset_x_end: Option<f32>,
    pub fail_offset_y_start: Option<f32>,
    pub fail_offset_y_end: Option<f32>,
    pub min_duration_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub number_of_taps: Option<u32>,
    pub max_delta_x: Option<f32>,
    pub max_delta_y: Option<f32>,
    pub direction: Option<Directions>,
}

impl HandlerConfig {
    /// A config with engine-level defaults and no thresholds set.
    pub fn enabled_default() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Merge a sparse update into this config.
    ///
    /// Options the update leaves unset keep their current values; `enabled`
    /// defaults to true only when it has never been set by any update.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
        if let Some(manual) = update.manual_activation {
            self.manual_activation = manual;
        }
        if let Some(needs) = update.needs_pointer_data {
            self.needs_pointer_data = needs;
        }

        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if update.$field.is_some() {
                    self.$field = update.$field;
                })*
            };
        }
        merge!(
            should_cancel_when_outside,
            hit_slop,
            min_pointers,
            max_pointers,
            min_dist,
            max_dist,
            min_velocity,
            min_velocity_x,
            min_velocity_y,
            active_offset_x_start,
            active_offset_x_end,
            active_offset_y_start,
            active_offset_y_end,
            fail_offset_x_start,
            fail_offset_x_end,
            fail_offset_y_start,
            fail_offset_y_end,
            min_duration_ms,
            max_duration_ms,
            max_delay_ms,
            number_of_taps,
            max_delta_x,
            max_delta_y,
            direction,
        );
    }
}

/// A sparse configuration record as delivered by the host.
///
/// Unknown keys are ignored; relation lists replace the handler's previous
/// relations wholesale when present.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigUpdate {
    pub enabled: Option<bool>,
    pub manual_activation: Option<bool>,
    pub needs_pointer_data: Option<bool>,
    pub should_cancel_when_outside: Option<bool>,
    pub hit_slop: Option<HitSlop>,
    pub min_pointers: Option<usize>,
    pub max_pointers: Option<usize>,
    pub min_dist: Option<f32>,
    pub max_dist: Option<f32>,
    pub min_velocity: Option<f32>,
    pub min_velocity_x: Option<f32>,
    pub min_velocity_y: Option<f32>,
    pub active_offset_x_start: Option<f32>,
    pub active_offset_x_end: Option<f32>,
    pub active_offset_y_start: Option<f32>,
    pub active_offset_y_end: Option<f32>,
    pub fail_offset_x_start: Option<f32>,
    pub fail_offset_x_end: Option<f32>,
    pub fail_offset_y_start: Option<f32>,
    pub fail_offset_y_end: Option<f32>,
    pub min_duration_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub number_of_taps: Option<u32>,
    pub max_delta_x: Option<f32>,
    pub max_delta_y: Option<f32>,
    pub direction: Option<Directions>,
    /// Handlers this one may recognize together with.
    pub simultaneous_handlers: Option<Vec<HandlerTag>>,
    /// Handlers whose failure this one waits for.
    pub wait_for: Option<Vec<HandlerTag>>,
    /// Handlers this one blocks while it is active.
    pub blocks_handlers: Option<Vec<HandlerTag>>,
}

impl ConfigUpdate {
    /// Deserialize an update from the bridge's JSON record.
    pub fn from_json(value: &serde_json::Value) -> GestureResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|err| GestureError::MalformedConfig(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_directions_mask() {
        let horizontal = Directions(Directions::LEFT.0 | Directions::RIGHT.0);
        assert!(horizontal.contains(Directions::LEFT));
        assert!(horizontal.contains(Directions::RIGHT));
        assert!(!horizontal.contains(Directions::UP));
        assert!(Directions::default().is_empty());
    }

    #[test]
    fn test_update_from_json_camel_case() {
        let update = ConfigUpdate::from_json(&json!({
            "minDurationMs": 800,
            "shouldCancelWhenOutside": true,
            "hitSlop": { "left": 10.0 },
            "waitFor": [3, 4],
            "unknownOption": "ignored",
        }))
        .unwrap();
        assert_eq!(update.min_duration_ms, Some(800));
        assert_eq!(update.should_cancel_when_outside, Some(true));
        assert_eq!(update.hit_slop.unwrap().left, Some(10.0));
        assert_eq!(update.wait_for, Some(vec![3, 4]));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = ConfigUpdate::from_json(&json!({ "minDurationMs": "soon" })).unwrap_err();
        assert!(matches!(err, GestureError::MalformedConfig(_)));
    }

    #[test]
    fn test_sparse_merge_retains_previous_values() {
        let mut config = HandlerConfig::enabled_default();
        config.apply(&ConfigUpdate {
            min_duration_ms: Some(800),
            ..Default::default()
        });
        config.apply(&ConfigUpdate {
            number_of_taps: Some(2),
            ..Default::default()
        });

        assert!(config.enabled);
        assert_eq!(config.min_duration_ms, Some(800));
        assert_eq!(config.number_of_taps, Some(2));
    }

    #[test]
    fn test_enabled_can_be_toggled() {
        let mut config = HandlerConfig::enabled_default();
        config.apply(&ConfigUpdate {
            enabled: Some(false),
            ..Default::default()
        });
        assert!(!config.enabled);
        // An update that doesn't mention `enabled` leaves it off.
        config.apply(&ConfigUpdate::default());
        assert!(!config.enabled);
    }
}
