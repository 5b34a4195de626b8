//! A surface that records draw calls instead of rasterizing them.
//!
//! Used by the test suite and the headless demo; also handy for hosts that
//! want to diff frames or drive a custom batcher.

use crate::core::geo::{ScreenPoint, ScreenRect};
use crate::render::color::Color;
use crate::render::surface::{MarkerIcon, RenderSurface, TileImage};

/// One recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Tile {
        dst: ScreenRect,
        width: u32,
        height: u32,
    },
    Circle {
        center: ScreenPoint,
        radius: f64,
        color: Color,
    },
    Triangle {
        a: ScreenPoint,
        b: ScreenPoint,
        c: ScreenPoint,
        color: Color,
    },
    Text {
        text: String,
        at: ScreenPoint,
        size: f64,
        color: Color,
    },
    Icon {
        icon: MarkerIcon,
        white: bool,
        dst: ScreenRect,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn tile_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Tile { .. }))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_tile(&mut self, image: &TileImage, dst: ScreenRect) {
        self.ops.push(DrawOp::Tile {
            dst,
            width: image.width(),
            height: image.height(),
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Color) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint, color: Color) {
        self.ops.push(DrawOp::Triangle { a, b, c, color });
    }

    fn fill_text(&mut self, text: &str, at: ScreenPoint, size: f64, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            size,
            color,
        });
    }

    fn measure_text(&mut self, text: &str, size: f64) -> f64 {
        // Flat-width approximation; deterministic for tests
        text.chars().count() as f64 * size * 0.6
    }

    fn draw_marker_icon(&mut self, icon: MarkerIcon, white: bool, dst: ScreenRect) {
        self.ops.push(DrawOp::Icon { icon, white, dst });
    }
}
