//! Input model: mouse buttons and the drag gesture state machine.
//!
//! A drag starts when the primary button goes down over a region body and
//! lasts until the button is released, wherever the pointer travels in
//! between. Hover is only tracked while no drag is in progress.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::projection::Point;
use crate::region::RegionId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    /// No gesture; pointer motion only updates hover.
    #[default]
    Idle,
    /// A region follows the pointer until release.
    DraggingRegion {
        /// The region being dragged.
        id: RegionId,
    },
}

impl InputState {
    #[must_use]
    pub fn dragging(self) -> Option<RegionId> {
        match self {
            Self::DraggingRegion { id } => Some(id),
            Self::Idle => None,
        }
    }
}

/// Pointer cursor shown over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
    Grab,
    Grabbing,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

/// Convert a client-space pointer position to map pixels.
///
/// `rect_origin` is the top-left of the canvas bounding rect, which lies
/// outside its border; `border` is the left and top border width.
#[must_use]
pub fn client_to_map(client: Point, rect_origin: Point, border: Point) -> Point {
    Point::new(client.x - rect_origin.x - border.x, client.y - rect_origin.y - border.y)
}
