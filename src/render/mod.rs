pub mod color;
pub mod context;
pub mod recording;
pub mod surface;

// Re-exports for convenience
pub use color::Color;
pub use context::DrawContext;
pub use surface::{MarkerIcon, RenderSurface, TileImage};
