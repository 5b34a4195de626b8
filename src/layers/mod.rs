pub mod base;
pub mod pin;
pub mod waypoints;

// Re-exports for convenience
pub use base::Drawable;
pub use pin::PinOverlay;
pub use waypoints::{Spot, WaypointSet};
