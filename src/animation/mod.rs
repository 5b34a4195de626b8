pub mod animator;
pub mod interpolation;
pub mod transitions;

// Re-exports for convenience
pub use animator::{Animator, AnimatorTick};
pub use interpolation::Interpolator;
pub use transitions::{CenterTransition, ScaleTransition};
