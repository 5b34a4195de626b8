use serde::{Deserialize, Serialize};

use crate::core::constants::{MAX_SCALE, MIN_SCALE, TILE_SIZE};
use crate::core::geo::{ScreenPoint, TileRange, WorldPoint, WorldRect};

/// Manages the current view of the map: scale, pan offset and screen size.
///
/// `offset` is the world coordinate under the viewport's top-left pixel.
/// All conversions between screen pixels, world units and tile indices go
/// through this type; it has no side effects and no knowledge of the
/// render loop, so it can be exercised standalone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    scale: f64,
    offset: WorldPoint,
    size: ScreenPoint,
    /// Finite world bounds of the scrollable area, when the dimension has any
    bounds: Option<WorldRect>,
}

impl Viewport {
    /// Creates a new viewport; scale is clamped to the engine range
    pub fn new(offset: WorldPoint, scale: f64, size: ScreenPoint) -> Self {
        Self {
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
            offset,
            size,
            bounds: None,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> WorldPoint {
        self.offset
    }

    pub fn size(&self) -> ScreenPoint {
        self.size
    }

    pub fn bounds(&self) -> Option<&WorldRect> {
        self.bounds.as_ref()
    }

    /// Sets the scrollable world bounds and re-clamps the current offset
    pub fn set_bounds(&mut self, bounds: Option<WorldRect>) {
        self.bounds = bounds;
        self.clamp_offset();
    }

    /// Updates the viewport pixel size (host resize handler)
    pub fn set_size(&mut self, size: ScreenPoint) {
        self.size = size;
        self.clamp_offset();
    }

    /// Sets the scale without moving the top-left anchor.
    /// Returns the clamped value actually applied.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self.clamp_offset();
        self.scale
    }

    /// Converts a screen pixel position to world coordinates
    pub fn screen_to_world(&self, point: &ScreenPoint) -> WorldPoint {
        WorldPoint::new(
            point.x / self.scale + self.offset.x,
            point.y / self.scale + self.offset.z,
        )
    }

    /// Converts world coordinates to a screen pixel position
    pub fn world_to_screen(&self, point: &WorldPoint) -> ScreenPoint {
        ScreenPoint::new(
            (point.x - self.offset.x) * self.scale,
            (point.z - self.offset.z) * self.scale,
        )
    }

    /// World-space rect currently covered by the viewport
    pub fn world_rect(&self) -> WorldRect {
        WorldRect::new(
            self.offset.x,
            self.offset.z,
            self.offset.x + self.size.x / self.scale,
            self.offset.z + self.size.y / self.scale,
        )
    }

    /// Every tile index intersecting the current view, edge tiles included
    pub fn visible_tiles(&self) -> TileRange {
        TileRange::covering(&self.world_rect())
    }

    /// World coordinate at the viewport center
    pub fn center(&self) -> WorldPoint {
        self.world_rect().center()
    }

    /// Screen pixel position of the viewport center
    pub fn center_screen(&self) -> ScreenPoint {
        ScreenPoint::new(self.size.x / 2.0, self.size.y / 2.0)
    }

    /// Recenters the view on the given world coordinate
    pub fn set_center(&mut self, center: WorldPoint) {
        self.offset = WorldPoint::new(
            center.x - self.size.x / 2.0 / self.scale,
            center.z - self.size.y / 2.0 / self.scale,
        );
        self.clamp_offset();
    }

    /// Translates the view by a screen-pixel delta (drag gesture)
    pub fn pan_screen(&mut self, delta: &ScreenPoint) {
        self.offset.x += delta.x / self.scale;
        self.offset.z += delta.y / self.scale;
        self.clamp_offset();
    }

    /// Changes the scale while keeping the world coordinate under `anchor`
    /// fixed on screen. Returns the clamped scale actually applied.
    ///
    /// The top-left offset shifts by `anchor/old − anchor/new`: the distance
    /// from the corner to the anchor shrinks by `old/new` when zooming in.
    pub fn zoom_about(&mut self, new_scale: f64, anchor: &ScreenPoint) -> f64 {
        let old = self.scale;
        let new = new_scale.clamp(MIN_SCALE, MAX_SCALE);

        self.offset.x += anchor.x / old - anchor.x / new;
        self.offset.z += anchor.y / old - anchor.y / new;
        self.scale = new;
        self.clamp_offset();

        self.scale
    }

    /// Number of tiles needed to cover one screen plus a one-tile margin.
    /// The tile cache evicts down to this budget.
    pub fn tile_budget(&self) -> usize {
        let across = (self.size.x / TILE_SIZE / self.scale).ceil() as usize + 1;
        let down = (self.size.y / TILE_SIZE / self.scale).ceil() as usize + 1;
        across * down
    }

    /// Keeps the view inside the world bounds when they are finite.
    /// When the world is narrower than the viewport the view pins to the
    /// bounds' minimum edge.
    fn clamp_offset(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };

        let view_w = self.size.x / self.scale;
        let view_h = self.size.y / self.scale;

        let max_x = bounds.right - view_w;
        self.offset.x = if max_x < bounds.left {
            bounds.left
        } else {
            self.offset.x.clamp(bounds.left, max_x)
        };

        let max_z = bounds.bottom - view_h;
        self.offset.z = if max_z < bounds.top {
            bounds.top
        } else {
            self.offset.z.clamp(bounds.top, max_z)
        };
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(WorldPoint::new(0.0, 0.0), 1.0, ScreenPoint::new(800.0, 600.0))
    }
}
