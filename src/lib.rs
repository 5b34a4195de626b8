//! # chunkview
//!
//! A canvas-agnostic engine for infinitely scrollable, pannable, zoomable
//! tiled world maps (Minecraft-style world viewers).
//!
//! The crate owns the viewport state (scale, pan offset, visible tile
//! range), the coordinate math between screen pixels, world block
//! coordinates and tile indices, a demand-loaded tile cache, a waypoint
//! layer and an animated selection pin. It draws through the
//! [`render::surface::RenderSurface`] trait and is driven by the host
//! calling [`core::map::Map::tick`] once per display refresh, so it carries
//! no compiled-in dependency on any particular UI framework.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod render;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::TileBounds,
    config::{MapCallbacks, MapOptions},
    geo::{Dimension, ScreenPoint, TileCoord, WorldPoint, WorldRect},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::Drawable,
    pin::PinOverlay,
    waypoints::{Spot, WaypointSet},
};

pub use input::events::{InputEvent, PointerCoord};

pub use render::{context::DrawContext, surface::RenderSurface};

pub use animation::{animator::Animator, interpolation::Interpolator};

pub use tiles::{
    cache::TileCache,
    source::{TileFetcher, TileSource},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tile decode error: {0}")]
    TileDecode(#[from] image::ImageError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Error type alias for convenience
pub type Error = MapError;
