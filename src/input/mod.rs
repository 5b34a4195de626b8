pub mod events;
pub mod handler;

// Re-exports for convenience
pub use events::{InputEvent, PointerCoord};
pub use handler::{DragState, PinchState};
