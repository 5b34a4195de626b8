pub mod cache;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use cache::{TileCache, TileSlot};
pub use loader::{TileFetch, TileLoader};
pub use source::{GridTileSource, HttpFetcher, TileFetcher, TileSource};
