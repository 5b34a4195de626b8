use crate::render::context::DrawContext;

/// Anything the render loop can paint.
///
/// The engine composes each frame from an ordered list of drawables:
/// tiles, then waypoints, then the pin overlay. Implementations read the
/// frame's view parameters from the context and draw in screen pixels.
pub trait Drawable {
    fn draw(&self, ctx: &mut DrawContext<'_>);
}
