//! Identifier types shared across the engine.
//!
//! Handlers and views are identified by opaque integer tags assigned by the
//! host; the engine never interprets their values. Pointer ids come from the
//! platform and may be reused between physical touches, which is why the
//! tracker assigns its own stable [`TouchId`] per touch.

/// Opaque tag identifying a gesture handler instance. Assigned by the host.
pub type HandlerTag = i32;

/// Opaque tag identifying a view in the host view tree.
pub type ViewTag = i32;

/// Raw platform pointer id. May be recycled by the platform once a touch
/// ends.
pub type PointerId = u32;

/// Stable small integer assigned per physical touch, decoupled from
/// platform-reused pointer ids.
pub type TouchId = u32;

/// The kind of input device a pointer event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    /// A finger on a touch surface.
    #[default]
    Touch,
    /// A mouse device.
    Mouse,
    /// A stylus/pen device.
    Pen,
    /// Any other source.
    Other,
}

impl PointerType {
    /// Map a raw platform source-type code to a pointer type.
    ///
    /// Unknown codes map to [`PointerType::Other`]; the routing layer treats
    /// them like touch input without mouse/pen exclusivity.
    pub fn from_source_code(code: u32) -> Self {
        match code {
            1 => Self::Mouse,
            2 => Self::Pen,
            3 => Self::Touch,
            _ => Self::Other,
        }
    }

    /// Whether this pointer comes from a hover-capable device (mouse/pen).
    pub fn is_hover_capable(self) -> bool {
        matches!(self, Self::Mouse | Self::Pen)
    }
}
