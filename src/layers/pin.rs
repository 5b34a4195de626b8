use instant::Instant;

use crate::animation::animator::{Animator, AnimatorTick};
use crate::animation::interpolation::Interpolator;
use crate::core::constants::{MOVE_ANIMATION_DURATION, PIN_BOUNCE, PIN_POP_DURATION, PIN_TRAVEL_LIFT};
use crate::core::geo::{ScreenPoint, WorldPoint};
use crate::layers::base::Drawable;
use crate::render::color;
use crate::render::context::DrawContext;

const HEAD_OFFSET: f64 = 40.0;
const HEAD_RADIUS: f64 = 20.0;
const INNER_RADIUS: f64 = 10.0;

#[derive(Debug)]
enum PinPhase {
    Idle,
    /// Popping into view, scale 0 → 1 with overshoot
    Appearing(Animator),
    /// Flying to a new coordinate along the travel arc
    Travelling(Animator),
    /// Popping out of view, scale 1 → 0
    Hiding(Animator),
}

/// The animated marker indicating the currently focused coordinate.
///
/// One pin exists per map. `show_at` and `hide` are the only mutators;
/// the render loop polls `update` each frame and draws the result. The
/// pin keeps a constant screen size regardless of map scale.
#[derive(Debug)]
pub struct PinOverlay {
    pos: WorldPoint,
    visible: bool,
    /// 0..1 pop scale; overshoots slightly while appearing
    scale: f64,
    /// Vertical needle offset in pixels while the pin lifts off or lands
    pointing_offset: f64,
    move_from: WorldPoint,
    move_to: WorldPoint,
    phase: PinPhase,
}

impl PinOverlay {
    pub fn new() -> Self {
        Self {
            pos: WorldPoint::new(0.0, 0.0),
            visible: false,
            scale: 1.0,
            pointing_offset: 0.0,
            move_from: WorldPoint::new(0.0, 0.0),
            move_to: WorldPoint::new(0.0, 0.0),
            phase: PinPhase::Idle,
        }
    }

    pub fn position(&self) -> WorldPoint {
        self.pos
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pop_scale(&self) -> f64 {
        self.scale
    }

    /// Shows the pin at `target`: an animated flight when it is already on
    /// screen, an animated pop otherwise.
    pub fn show_at(&mut self, target: WorldPoint, now: Instant) {
        if self.visible && !matches!(self.phase, PinPhase::Hiding(_)) {
            self.move_from = self.pos;
            self.move_to = target;
            let mut animator = Animator::new(MOVE_ANIMATION_DURATION);
            animator.start(now);
            self.phase = PinPhase::Travelling(animator);
        } else {
            self.pos = target;
            self.visible = true;
            self.scale = 0.0;
            self.pointing_offset = 0.0;
            let mut animator =
                Animator::new(PIN_POP_DURATION).with_interpolator(Interpolator::Overshoot);
            animator.start(now);
            self.phase = PinPhase::Appearing(animator);
        }
    }

    /// Animates the pin out of view
    pub fn hide(&mut self, now: Instant) {
        if !self.visible {
            return;
        }
        let mut animator = Animator::new(PIN_POP_DURATION)
            .with_interpolator(Interpolator::Overshoot)
            .reversed();
        animator.start(now);
        self.phase = PinPhase::Hiding(animator);
    }

    /// Stops whatever animation is in flight, holding the current state
    pub fn cancel_animation(&mut self) {
        match &mut self.phase {
            PinPhase::Appearing(a) | PinPhase::Travelling(a) | PinPhase::Hiding(a) => a.cancel(),
            PinPhase::Idle => {}
        }
        self.phase = PinPhase::Idle;
    }

    /// Advances the active animation. Returns true when the pin changed
    /// and the frame needs a redraw.
    pub fn update(&mut self, now: Instant) -> bool {
        match &mut self.phase {
            PinPhase::Idle => false,
            PinPhase::Appearing(animator) => match animator.tick(now) {
                AnimatorTick::Frame(v) => {
                    self.scale = v;
                    true
                }
                AnimatorTick::Finished(_) => {
                    self.scale = 1.0;
                    self.phase = PinPhase::Idle;
                    true
                }
                AnimatorTick::Pending | AnimatorTick::Done => false,
            },
            PinPhase::Travelling(animator) => match animator.tick(now) {
                AnimatorTick::Frame(ratio) => {
                    self.travel(ratio);
                    true
                }
                AnimatorTick::Finished(_) => {
                    self.pos = self.move_to;
                    self.pointing_offset = 0.0;
                    self.phase = PinPhase::Idle;
                    true
                }
                AnimatorTick::Pending | AnimatorTick::Done => false,
            },
            PinPhase::Hiding(animator) => match animator.tick(now) {
                AnimatorTick::Frame(v) => {
                    self.scale = v.max(0.0);
                    true
                }
                AnimatorTick::Finished(_) => {
                    self.scale = 0.0;
                    self.visible = false;
                    self.phase = PinPhase::Idle;
                    true
                }
                AnimatorTick::Pending | AnimatorTick::Done => false,
            },
        }
    }

    /// The three-phase flight: needle lifts, arcs over, lands.
    fn travel(&mut self, ratio: f64) {
        if ratio < 0.1 {
            let t = ratio / 0.1;
            self.pointing_offset = -PIN_BOUNCE * t;
        } else if ratio < 0.9 {
            let t = (ratio - 0.1) / 0.8;
            let lift = PIN_TRAVEL_LIFT * Interpolator::SwanDive.apply(t) / self.scale.max(1e-6);
            self.pos = WorldPoint::new(
                self.move_from.x + (self.move_to.x - self.move_from.x) * t,
                self.move_from.z + (self.move_to.z - self.move_from.z) * t - lift,
            );
        } else {
            let t = (ratio - 0.9) / 0.1;
            self.pointing_offset = -PIN_BOUNCE * (1.0 - t);
        }
    }
}

impl Default for PinOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawable for PinOverlay {
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if !self.visible {
            return;
        }

        let at = ctx.world_to_screen(&self.pos);
        let head = ScreenPoint::new(at.x, at.y - HEAD_OFFSET * self.scale);

        ctx.surface()
            .fill_circle(head, HEAD_RADIUS * self.scale, color::PIN_RED);

        // needle from the pointed coordinate up to the head's flanks
        let flank = std::f64::consts::FRAC_PI_3;
        let tip = ScreenPoint::new(at.x, at.y + self.pointing_offset);
        let right = ScreenPoint::new(
            at.x + HEAD_RADIUS * flank.sin() * self.scale,
            at.y + (-HEAD_OFFSET + HEAD_RADIUS * flank.cos()) * self.scale,
        );
        let left = ScreenPoint::new(
            at.x - HEAD_RADIUS * flank.sin() * self.scale,
            at.y + (-HEAD_OFFSET + HEAD_RADIUS * flank.cos()) * self.scale,
        );
        ctx.surface().fill_triangle(tip, right, left, color::PIN_RED);

        ctx.surface()
            .fill_circle(head, INNER_RADIUS * self.scale, color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::WorldRect;
    use crate::render::recording::{DrawOp, RecordingSurface};
    use std::time::Duration;

    #[test]
    fn test_appear_pops_from_zero_to_full_size() {
        let mut pin = PinOverlay::new();
        let t0 = Instant::now();
        assert!(!pin.is_visible());

        pin.show_at(WorldPoint::new(100.0, 200.0), t0);
        assert!(pin.is_visible());
        assert_eq!(pin.pop_scale(), 0.0);

        pin.update(t0 + PIN_POP_DURATION / 2);
        assert!(pin.pop_scale() > 0.0);

        pin.update(t0 + PIN_POP_DURATION);
        assert_eq!(pin.pop_scale(), 1.0);
        assert_eq!(pin.position(), WorldPoint::new(100.0, 200.0));
    }

    #[test]
    fn test_overshoot_peaks_above_full_size() {
        let mut pin = PinOverlay::new();
        let t0 = Instant::now();
        pin.show_at(WorldPoint::new(0.0, 0.0), t0);

        // 4/5 through the pop is the overshoot peak
        pin.update(t0 + PIN_POP_DURATION.mul_f64(0.8));
        assert!(pin.pop_scale() > 1.0);
    }

    #[test]
    fn test_show_when_visible_travels_with_arc() {
        let mut pin = PinOverlay::new();
        let t0 = Instant::now();
        pin.show_at(WorldPoint::new(0.0, 0.0), t0);
        pin.update(t0 + PIN_POP_DURATION);

        let t1 = t0 + Duration::from_secs(5);
        pin.show_at(WorldPoint::new(800.0, 0.0), t1);

        // halfway: horizontally centered, lifted by the full arc height
        pin.update(t1 + MOVE_ANIMATION_DURATION / 2);
        let mid = pin.position();
        assert!((mid.x - 400.0).abs() < 1e-9);
        assert!((mid.z + PIN_TRAVEL_LIFT).abs() < 1e-9);

        pin.update(t1 + MOVE_ANIMATION_DURATION);
        assert_eq!(pin.position(), WorldPoint::new(800.0, 0.0));
        assert_eq!(pin.pointing_offset, 0.0);
    }

    #[test]
    fn test_needle_bounces_at_travel_start() {
        let mut pin = PinOverlay::new();
        let t0 = Instant::now();
        pin.show_at(WorldPoint::new(0.0, 0.0), t0);
        pin.update(t0 + PIN_POP_DURATION);

        let t1 = t0 + Duration::from_secs(5);
        pin.show_at(WorldPoint::new(100.0, 100.0), t1);
        pin.update(t1 + MOVE_ANIMATION_DURATION.mul_f64(0.05));
        assert!((pin.pointing_offset + PIN_BOUNCE / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_hide_shrinks_then_disappears() {
        let mut pin = PinOverlay::new();
        let t0 = Instant::now();
        pin.show_at(WorldPoint::new(0.0, 0.0), t0);
        pin.update(t0 + PIN_POP_DURATION);

        let t1 = t0 + Duration::from_secs(1);
        pin.hide(t1);
        assert!(pin.is_visible());

        pin.update(t1 + PIN_POP_DURATION);
        assert!(!pin.is_visible());
        assert_eq!(pin.pop_scale(), 0.0);
    }

    #[test]
    fn test_hide_when_already_hidden_is_a_no_op() {
        let mut pin = PinOverlay::new();
        let t0 = Instant::now();
        pin.hide(t0);
        assert!(!pin.update(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_hidden_pin_draws_nothing() {
        let pin = PinOverlay::new();
        let mut surface = RecordingSurface::new();
        let rect = WorldRect::new(0.0, 0.0, 512.0, 512.0);
        let mut ctx = DrawContext::new(&mut surface, rect, 1.0);
        pin.draw(&mut ctx);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_draw_stacks_head_needle_and_dot() {
        let mut pin = PinOverlay::new();
        let t0 = Instant::now();
        pin.show_at(WorldPoint::new(256.0, 256.0), t0);
        pin.update(t0 + PIN_POP_DURATION);

        let mut surface = RecordingSurface::new();
        let rect = WorldRect::new(0.0, 0.0, 512.0, 512.0);
        let mut ctx = DrawContext::new(&mut surface, rect, 1.0);
        pin.draw(&mut ctx);

        assert_eq!(surface.ops().len(), 3);
        match (&surface.ops()[0], &surface.ops()[2]) {
            (
                DrawOp::Circle { center, radius, .. },
                DrawOp::Circle {
                    radius: inner_radius,
                    ..
                },
            ) => {
                assert_eq!(*center, ScreenPoint::new(256.0, 256.0 - HEAD_OFFSET));
                assert_eq!(*radius, HEAD_RADIUS);
                assert_eq!(*inner_radius, INNER_RADIUS);
            }
            other => panic!("unexpected ops {:?}", other),
        }
        assert!(matches!(surface.ops()[1], DrawOp::Triangle { .. }));
    }
}
