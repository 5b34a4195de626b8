use crate::core::geo::{ScreenPoint, ScreenRect};
use crate::render::color::Color;
use crate::Result;

/// A decoded tile raster, ready for a surface to blit.
#[derive(Debug, Clone)]
pub struct TileImage {
    image: image::RgbaImage,
}

impl TileImage {
    /// Decodes fetched tile bytes (PNG from the tile service)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self { image })
    }

    pub fn from_raster(image: image::RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// A zero-dimension image draws nothing, mirroring an incomplete
    /// browser image element
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn raster(&self) -> &image::RgbaImage {
        &self.image
    }
}

/// Icon drawn inside transit markers. The host supplies the actual pixels;
/// the engine only names which glyph it wants and whether the inverted
/// (white) variant fits the marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerIcon {
    Train,
    Subway,
}

/// Drawing backend the engine renders through.
///
/// Hosts implement this over their real canvas (HTML canvas via wasm
/// bindings, a GPU quad batcher, a pixel buffer). Implementations should
/// blit tiles with nearest-neighbor sampling; tile art is pixel art.
/// All coordinates are screen pixels.
pub trait RenderSurface {
    /// Clears the whole frame
    fn clear(&mut self);

    /// Blits a tile image into the destination rect
    fn draw_tile(&mut self, image: &TileImage, dst: ScreenRect);

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color);

    fn fill_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint, color: Color);

    /// Draws `text` with its baseline-left at `at`
    fn fill_text(&mut self, text: &str, at: ScreenPoint, size: f64, color: Color);

    /// Width in pixels `text` would occupy at `size`
    fn measure_text(&mut self, text: &str, size: f64) -> f64;

    fn draw_marker_icon(&mut self, icon: MarkerIcon, white: bool, dst: ScreenRect);
}
