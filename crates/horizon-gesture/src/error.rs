//! Error types for the gesture engine.

use horizon_gesture_core::{HandlerTag, ViewTag};
use thiserror::Error;

/// Errors surfaced by the configuration protocol and the touch pipeline.
///
/// Configuration errors never crash the pipeline: the offending operation is
/// logged and skipped, and engine state stays consistent for the next event.
/// An unknown raw action code drops only the single event carrying it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    /// A handler tag that is not present in the registry was referenced.
    #[error("unknown handler tag: {0}")]
    UnknownHandler(HandlerTag),

    /// A gesture root that was never registered was referenced.
    #[error("unknown gesture root: {0}")]
    UnknownRoot(ViewTag),

    /// A handler kind name not covered by the recognizer factory.
    #[error("unknown handler kind: {0:?}")]
    UnknownHandlerKind(String),

    /// A raw touch event carried an unrecognized action code.
    #[error("unknown touch action code: {0}")]
    UnknownTouchPhase(u32),

    /// A configuration record could not be deserialized.
    #[error("malformed handler config: {0}")]
    MalformedConfig(String),
}

/// A specialized Result type for gesture engine operations.
pub type GestureResult<T> = Result<T, GestureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GestureError::UnknownHandler(7).to_string(),
            "unknown handler tag: 7"
        );
        assert_eq!(
            GestureError::UnknownTouchPhase(9).to_string(),
            "unknown touch action code: 9"
        );
    }
}
