//! Engine-wide magic numbers, kept in one place so view tuning does not
//! require hunting through the render path.

use std::time::Duration;

/// Square tile edge length in world units (1:1 with pixels at scale 1.0).
pub const TILE_SIZE: f64 = 512.0;

/// Smallest allowed view scale.
pub const MIN_SCALE: f64 = 0.3;

/// Largest allowed view scale.
pub const MAX_SCALE: f64 = 10.0;

/// Programmatic +/- step for `zoom_in`/`zoom_out`.
pub const ZOOM_STEP: f64 = 0.5;

/// Wheel delta divisor; one notch of a typical wheel is ~100 units.
pub const WHEEL_SCALE_DIVISOR: f64 = 200.0;

/// Marker hit/draw radius in screen pixels.
pub const MARK_RADIUS: f64 = 10.0;

/// Duration of animated scale changes (zoom buttons).
pub const SCALE_ANIMATION_DURATION: Duration = Duration::from_millis(500);

/// Duration of the animated recenter when focusing a point.
pub const MOVE_ANIMATION_DURATION: Duration = Duration::from_millis(600);

/// Duration of the pin's appear/hide pop.
pub const PIN_POP_DURATION: Duration = Duration::from_millis(300);

/// Horizontal inset applied when focusing a point on wide viewports, in
/// world units, leaving room for a host-side detail panel.
pub const FOCUS_PANEL_INSET: f64 = 210.0;

/// Viewports at least this many pixels wide get the focus inset.
pub const WIDE_VIEWPORT_MIN_WIDTH: f64 = 800.0;

/// Chance per idle frame of running a cache eviction pass.
pub const CACHE_GC_PROBABILITY: f64 = 0.01;

/// Height of the pin's travel arc in screen pixels.
pub const PIN_TRAVEL_LIFT: f64 = 200.0;

/// Vertical bounce of the pin needle at travel start/end, in pixels.
pub const PIN_BOUNCE: f64 = 20.0;
