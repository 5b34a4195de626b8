use serde::{Deserialize, Serialize};

use crate::core::geo::ScreenPoint;

/// A pointer position in canvas-relative pixels, regardless of whether it
/// came from a mouse, a pen or a finger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerCoord {
    pub x: f64,
    pub y: f64,
}

impl PointerCoord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_screen(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

/// Input events the host forwards from its canvas element.
///
/// The engine distinguishes clicks from drags itself (via a per-gesture
/// moved flag), so hosts should forward the raw press/move/release stream
/// plus the platform's click and wheel events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button or first touch pressed
    PointerDown { position: PointerCoord },
    /// Pointer moved, pressed or not
    PointerMove { position: PointerCoord },
    /// Primary button released or pointer left the canvas
    PointerUp,
    /// Click (press and release without movement filtering; the engine
    /// ignores it when the gesture dragged)
    Click { position: PointerCoord },
    /// Scroll wheel over the canvas
    Wheel { delta_y: f64, position: PointerCoord },
    /// Touch contact points changed; one entry per active touch
    TouchMove { touches: Vec<PointerCoord> },
    /// All touches lifted
    TouchEnd,
    /// Secondary button or long-press
    ContextMenu { position: PointerCoord },
    /// The canvas was resized
    Resize { width: f64, height: f64 },
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<PointerCoord> {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::Click { position }
            | InputEvent::Wheel { position, .. }
            | InputEvent::ContextMenu { position } => Some(*position),
            InputEvent::TouchMove { touches } => touches.first().copied(),
            InputEvent::PointerUp | InputEvent::TouchEnd | InputEvent::Resize { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_positions() {
        let click = InputEvent::Click {
            position: PointerCoord::new(100.0, 200.0),
        };
        assert_eq!(click.position(), Some(PointerCoord::new(100.0, 200.0)));

        assert_eq!(InputEvent::PointerUp.position(), None);

        let touch = InputEvent::TouchMove {
            touches: vec![PointerCoord::new(1.0, 2.0), PointerCoord::new(3.0, 4.0)],
        };
        assert_eq!(touch.position(), Some(PointerCoord::new(1.0, 2.0)));
    }
}
