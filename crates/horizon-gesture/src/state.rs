//! Handler lifecycle states.

use serde::{Serialize, Serializer};

/// The lifecycle state of a gesture handler.
///
/// `Undetermined` is the initial state; `Failed`, `Cancelled` and `End` are
/// terminal for a given gesture instance, after which the handler resets to
/// `Undetermined` and becomes eligible again. The numeric discriminants are
/// part of the outgoing event protocol and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum State {
    /// No gesture detected yet; the handler is idle.
    Undetermined = 0,
    /// The handler gave up on this touch sequence.
    Failed = 1,
    /// A gesture may be starting; the handler is watching the sequence.
    Began = 2,
    /// Another handler won the arbitration, or the host forced a cancel.
    Cancelled = 3,
    /// The gesture is recognized and owns the touch sequence.
    Active = 4,
    /// The gesture completed normally.
    End = 5,
}

impl State {
    /// Whether this state ends the gesture instance.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::End)
    }

    /// Human-readable name for logging.
    pub fn name(self) -> &'static str {
        match self {
            Self::Undetermined => "UNDETERMINED",
            Self::Failed => "FAILED",
            Self::Began => "BEGAN",
            Self::Cancelled => "CANCELLED",
            Self::Active => "ACTIVE",
            Self::End => "END",
        }
    }
}

impl Serialize for State {
    /// States cross the bridge as their numeric discriminants.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(State::Failed.is_terminal());
        assert!(State::Cancelled.is_terminal());
        assert!(State::End.is_terminal());
        assert!(!State::Undetermined.is_terminal());
        assert!(!State::Began.is_terminal());
        assert!(!State::Active.is_terminal());
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_value(State::Active).unwrap(), 4);
        assert_eq!(serde_json::to_value(State::Undetermined).unwrap(), 0);
    }

    #[test]
    fn test_wire_discriminants() {
        assert_eq!(State::Undetermined as u8, 0);
        assert_eq!(State::Failed as u8, 1);
        assert_eq!(State::Began as u8, 2);
        assert_eq!(State::Cancelled as u8, 3);
        assert_eq!(State::Active as u8, 4);
        assert_eq!(State::End as u8, 5);
    }
}
