use std::f64::consts::PI;

/// Easing curves mapping an animation progress ratio in `[0, 1]` to an
/// eased ratio.
///
/// Most curves stay within `[0, 1]`; `Overshoot` intentionally exceeds 1.0
/// near the end for a pop effect, and `SwanDive`/`Vibrate` are shaping
/// curves for arcs and oscillation rather than progress remaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolator {
    /// Identity
    Linear,
    /// Ease-in-out, used for scale and pan transitions
    AccelerateDecelerate,
    /// Small overshoot past 1.0 before settling, used for the pin pop
    Overshoot,
    /// Parabolic rise-then-fall, used for the pin's travel arc
    SwanDive,
    /// One full oscillation
    Vibrate,
}

impl Interpolator {
    /// Apply the curve to a progress ratio
    pub fn apply(&self, ratio: f64) -> f64 {
        match self {
            Interpolator::Linear => ratio,
            Interpolator::AccelerateDecelerate => (((ratio - 0.5) * PI).sin() + 1.0) / 2.0,
            Interpolator::Overshoot => (-5.0 / 3.0) * (ratio - 4.0 / 5.0).powi(2) + 16.0 / 15.0,
            Interpolator::SwanDive => -(ratio * 2.0 - 1.0).powi(2) + 1.0,
            Interpolator::Vibrate => -(ratio * 2.0 * PI).sin(),
        }
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Interpolator::Linear
    }
}
