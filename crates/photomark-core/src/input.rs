//! Pointer input vocabulary for unified mouse/touch handling.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// The primary button or a single touch contact.
    Primary,
    /// The secondary (pan-triggering) button, e.g. right-click.
    Secondary,
    /// The middle button, also treated as pan-triggering.
    Middle,
}

impl PointerButton {
    /// Whether this button starts a pan rather than a stroke.
    pub fn is_pan_trigger(&self) -> bool {
        matches!(self, PointerButton::Secondary | PointerButton::Middle)
    }
}

/// Pointer event type, delivered one at a time in arrival order.
///
/// Positions are in screen pixels, relative to the window; the editor
/// subtracts the drawing surface's origin before any further conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: PointerButton,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure: Option<f64>,
    },
    Move {
        position: Point,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pressure: Option<f64>,
    },
    Up {
        position: Point,
        button: PointerButton,
    },
}

impl PointerEvent {
    /// Convenience constructor for a primary-button press.
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: PointerButton::Primary,
            pressure: None,
        }
    }

    /// Convenience constructor for a move.
    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
            pressure: None,
        }
    }

    /// Convenience constructor for a primary-button release.
    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }
}
