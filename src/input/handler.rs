use crate::core::geo::ScreenPoint;
use crate::input::events::PointerCoord;

/// Tracks one press-move-release gesture.
///
/// `moved` is what separates a click from a drag: any drag-move during the
/// gesture sets it, and the click handler bails out when it is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    pub down: bool,
    pub moved: bool,
    prev: ScreenPoint,
}

impl DragState {
    pub fn press(&mut self, at: &PointerCoord) {
        self.down = true;
        self.moved = false;
        self.prev = at.to_screen();
    }

    /// Consumes a move event; when the pointer is held, returns the
    /// screen-space pan delta (previous − current) and advances the anchor.
    pub fn drag(&mut self, at: &PointerCoord) -> Option<ScreenPoint> {
        self.moved = true;
        if !self.down {
            return None;
        }
        let current = at.to_screen();
        let delta = self.prev.subtract(&current);
        self.prev = current;
        Some(delta)
    }

    pub fn release(&mut self) {
        self.down = false;
    }
}

/// Tracks a two-finger pinch.
///
/// The first two-finger contact records the midpoint and finger distance;
/// the scale then follows the distance ratio, anchored at that first
/// midpoint for the whole gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct PinchState {
    active: bool,
    anchor: ScreenPoint,
    start_distance: f64,
    start_scale: f64,
}

impl PinchState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn anchor(&self) -> ScreenPoint {
        self.anchor
    }

    /// Feeds the current two touch points. Returns the new target scale
    /// once the gesture is established; the first call only anchors.
    pub fn pinch(
        &mut self,
        first: &PointerCoord,
        second: &PointerCoord,
        current_scale: f64,
    ) -> Option<f64> {
        let a = first.to_screen();
        let b = second.to_screen();
        let distance = a.distance_to(&b);

        if !self.active {
            self.active = true;
            self.anchor = a.midpoint(&b);
            self.start_distance = distance;
            self.start_scale = current_scale;
            return None;
        }

        if self.start_distance <= 0.0 {
            return None;
        }
        Some(self.start_scale * distance / self.start_distance)
    }

    pub fn end(&mut self) {
        self.active = false;
        self.start_distance = 0.0;
    }
}
