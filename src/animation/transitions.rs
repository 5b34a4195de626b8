use instant::Instant;

use crate::animation::animator::{Animator, AnimatorTick};
use crate::animation::interpolation::Interpolator;
use crate::core::constants::{MOVE_ANIMATION_DURATION, SCALE_ANIMATION_DURATION};
use crate::core::geo::WorldPoint;

/// An animated scale change, polled from the frame loop.
#[derive(Debug)]
pub struct ScaleTransition {
    animator: Animator,
    from: f64,
    to: f64,
}

/// One frame of a scale transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFrame {
    pub scale: f64,
    pub finished: bool,
}

impl ScaleTransition {
    /// Starts an eased transition from `from` to `to`
    pub fn new(from: f64, to: f64, now: Instant) -> Self {
        let mut animator = Animator::new(SCALE_ANIMATION_DURATION)
            .with_interpolator(Interpolator::AccelerateDecelerate);
        animator.start(now);
        Self { from, to, animator }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn cancel(&mut self) {
        self.animator.cancel();
    }

    pub fn tick(&mut self, now: Instant) -> Option<ScaleFrame> {
        match self.animator.tick(now) {
            AnimatorTick::Frame(eased) => Some(ScaleFrame {
                scale: self.from + (self.to - self.from) * eased,
                finished: false,
            }),
            AnimatorTick::Finished(terminal) => Some(ScaleFrame {
                scale: self.from + (self.to - self.from) * terminal,
                finished: true,
            }),
            AnimatorTick::Pending | AnimatorTick::Done => None,
        }
    }
}

/// Animated recentering of the viewport.
///
/// The view glides linearly toward the target while the scale dips by 0.25
/// at mid-flight and returns, which reads as the camera pulling back to
/// cover the distance.
#[derive(Debug)]
pub struct CenterTransition {
    animator: Animator,
    from: WorldPoint,
    to: WorldPoint,
    base_scale: f64,
}

/// One frame of a recenter transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterFrame {
    pub center: WorldPoint,
    pub scale: f64,
    pub finished: bool,
}

impl CenterTransition {
    pub fn new(from: WorldPoint, to: WorldPoint, base_scale: f64, now: Instant) -> Self {
        let mut animator = Animator::new(MOVE_ANIMATION_DURATION);
        animator.start(now);
        Self {
            animator,
            from,
            to,
            base_scale,
        }
    }

    pub fn target(&self) -> WorldPoint {
        self.to
    }

    pub fn cancel(&mut self) {
        self.animator.cancel();
    }

    pub fn tick(&mut self, now: Instant) -> Option<CenterFrame> {
        let (ratio, finished) = match self.animator.tick(now) {
            AnimatorTick::Frame(r) => (r, false),
            AnimatorTick::Finished(r) => (r, true),
            AnimatorTick::Pending | AnimatorTick::Done => return None,
        };

        Some(CenterFrame {
            center: self.from.lerp(&self.to, ratio),
            scale: self.base_scale - 0.25 + (ratio - 0.5) * (ratio - 0.5),
            finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_scale_transition_settles_on_exact_target() {
        let t0 = Instant::now();
        let mut transition = ScaleTransition::new(1.0, 1.5, t0);

        let mid = transition.tick(t0 + Duration::from_millis(250)).unwrap();
        assert!(!mid.finished);
        assert!(mid.scale > 1.0 && mid.scale < 1.5);

        let end = transition.tick(t0 + SCALE_ANIMATION_DURATION).unwrap();
        assert!(end.finished);
        assert_eq!(end.scale, 1.5);

        assert!(transition.tick(t0 + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn test_center_transition_dips_scale_and_lands() {
        let t0 = Instant::now();
        let from = WorldPoint::new(0.0, 0.0);
        let to = WorldPoint::new(1000.0, -400.0);
        let mut transition = CenterTransition::new(from, to, 2.0, t0);

        let half = MOVE_ANIMATION_DURATION / 2;
        let mid = transition.tick(t0 + half).unwrap();
        assert_eq!(mid.center, WorldPoint::new(500.0, -200.0));
        assert!((mid.scale - 1.75).abs() < 1e-12);

        let end = transition.tick(t0 + MOVE_ANIMATION_DURATION).unwrap();
        assert!(end.finished);
        assert_eq!(end.center, to);
        assert!((end.scale - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cancelled_transition_produces_nothing() {
        let t0 = Instant::now();
        let mut transition = ScaleTransition::new(1.0, 2.0, t0);
        transition.cancel();
        assert!(transition.tick(t0 + Duration::from_millis(100)).is_none());
    }
}
