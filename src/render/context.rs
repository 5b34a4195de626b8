use crate::core::geo::{ScreenPoint, WorldPoint, WorldRect};
use crate::render::surface::RenderSurface;

/// Per-frame drawing context handed to every [`crate::layers::base::Drawable`].
///
/// Carries the surface plus the frame's view parameters, so drawables
/// position themselves in world coordinates and let the context project to
/// screen pixels.
pub struct DrawContext<'a> {
    surface: &'a mut dyn RenderSurface,
    rect: WorldRect,
    scale: f64,
}

impl<'a> DrawContext<'a> {
    pub fn new(surface: &'a mut dyn RenderSurface, rect: WorldRect, scale: f64) -> Self {
        Self {
            surface,
            rect,
            scale,
        }
    }

    pub fn surface(&mut self) -> &mut dyn RenderSurface {
        self.surface
    }

    /// World-space rect visible this frame
    pub fn rect(&self) -> &WorldRect {
        &self.rect
    }

    pub fn map_scale(&self) -> f64 {
        self.scale
    }

    /// Projects a world coordinate to screen pixels for this frame
    pub fn world_to_screen(&self, point: &WorldPoint) -> ScreenPoint {
        ScreenPoint::new(
            (point.x - self.rect.left) * self.scale,
            (point.z - self.rect.top) * self.scale,
        )
    }
}
