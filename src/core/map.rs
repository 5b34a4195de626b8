use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError};
use instant::Instant;

use crate::animation::transitions::{CenterTransition, ScaleTransition};
use crate::core::bounds::TileBounds;
use crate::core::config::{MapCallbacks, MapOptions};
use crate::core::constants::{
    CACHE_GC_PROBABILITY, FOCUS_PANEL_INSET, MARK_RADIUS, MAX_SCALE, MIN_SCALE,
    WHEEL_SCALE_DIVISOR, WIDE_VIEWPORT_MIN_WIDTH, ZOOM_STEP,
};
use crate::core::geo::{Dimension, WorldPoint};
use crate::core::viewport::Viewport;
use crate::input::events::{InputEvent, PointerCoord};
use crate::input::handler::{DragState, PinchState};
use crate::layers::base::Drawable;
use crate::layers::pin::PinOverlay;
use crate::layers::waypoints::{Spot, WaypointSet};
use crate::render::context::DrawContext;
use crate::render::surface::RenderSurface;
use crate::tiles::cache::TileCache;
use crate::tiles::source::{GridTileSource, HttpFetcher, TileFetcher};
use crate::{MapError, Result};

/// Where the engine is in its bind/run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not bound to a host; `tick` is a no-op
    Unbound,
    /// Waiting for the world-bounds fetch of a bounded dimension
    Binding,
    /// Frame loop live
    Running,
    /// The bounds fetch failed; still rendering, without clamping
    Failed,
}

/// Frame-loop counters, exposed for perf overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames that actually redrew
    pub drawn: u64,
    /// Frames skipped because nothing changed
    pub idle: u64,
}

/// The map engine: owns the viewport, the tile cache, the waypoint layer
/// and the pin overlay, and composes them into frames.
///
/// Hosts `bind` it once with a [`MapOptions`], forward input through
/// [`Map::handle_event`], and call [`Map::tick`] from their frame/tick
/// primitive (requestAnimationFrame, a winit event loop, a test clock).
/// Everything runs on the caller's thread; the only background work is
/// tile fetching, which reports back over a channel drained here.
pub struct Map {
    state: LifecycleState,
    viewport: Viewport,
    dimension: Dimension,
    callbacks: MapCallbacks,
    waypoints: WaypointSet,
    pin: PinOverlay,
    tiles: Option<TileCache>,
    bounds_rx: Option<Receiver<Result<TileBounds>>>,
    scale_transition: Option<ScaleTransition>,
    center_transition: Option<CenterTransition>,
    drag: DragState,
    pinch: PinchState,
    hovered: Option<usize>,
    pending_focus: Option<WorldPoint>,
    dirty: bool,
    error_shown: bool,
    stats: FrameStats,
}

impl Map {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Unbound,
            viewport: Viewport::default(),
            dimension: Dimension::Overworld,
            callbacks: MapCallbacks::default(),
            waypoints: WaypointSet::default(),
            pin: PinOverlay::new(),
            tiles: None,
            bounds_rx: None,
            scale_transition: None,
            center_transition: None,
            drag: DragState::default(),
            pinch: PinchState::default(),
            hovered: None,
            pending_focus: None,
            dirty: false,
            error_shown: false,
            stats: FrameStats::default(),
        }
    }

    /// One-time setup: sizes the viewport for the dimension's default
    /// view, wires the tile pipeline and, for bounded dimensions, starts
    /// the world-bounds fetch. Binding an already-bound map is an error.
    pub fn bind(&mut self, options: MapOptions) -> Result<()> {
        if self.state != LifecycleState::Unbound {
            return Err(MapError::InvalidArgument("map is already bound".into()).into());
        }

        let MapOptions {
            dimension,
            tile_prefix,
            spots,
            size,
            initial_focus,
            callbacks,
            fetcher,
        } = options;

        self.dimension = dimension;
        self.callbacks = callbacks;
        self.waypoints = WaypointSet::new(spots);
        self.viewport = Viewport::new(dimension.initial_top_left(), 1.0, size);
        self.pending_focus = initial_focus;
        self.pin = PinOverlay::new();
        self.drag = DragState::default();
        self.pinch = PinchState::default();
        self.hovered = None;
        self.error_shown = false;
        self.stats = FrameStats::default();

        let fetcher: Arc<dyn TileFetcher> = fetcher.unwrap_or_else(|| Arc::new(HttpFetcher));
        let source = GridTileSource::new(tile_prefix, dimension);

        self.state = if dimension.is_bounded() {
            self.bounds_rx = Some(Self::spawn_bounds_fetch(&source, Arc::clone(&fetcher)));
            LifecycleState::Binding
        } else {
            LifecycleState::Running
        };

        self.tiles = Some(TileCache::new(source, fetcher));
        self.dirty = true;
        log::info!("map bound: dimension={}", dimension);
        Ok(())
    }

    /// Tears the engine down: cancels transitions and forgets the tile
    /// pipeline. In-flight tile loads finish on their threads and are
    /// dropped with the channel. Safe to call even if `bind` never
    /// completed.
    pub fn unbind(&mut self) {
        if let Some(mut transition) = self.scale_transition.take() {
            transition.cancel();
        }
        if let Some(mut transition) = self.center_transition.take() {
            transition.cancel();
        }
        self.pin.cancel_animation();
        self.tiles = None;
        self.bounds_rx = None;
        self.callbacks = MapCallbacks::default();
        self.state = LifecycleState::Unbound;
        log::info!("map unbound");
    }

    fn spawn_bounds_fetch(
        source: &GridTileSource,
        fetcher: Arc<dyn TileFetcher>,
    ) -> Receiver<Result<TileBounds>> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let url = source.bounds_url();
        thread::spawn(move || {
            let result = fetcher
                .fetch(&url)
                .and_then(|bytes| TileBounds::from_json(&bytes).map_err(Into::into));
            let _ = tx.send(result);
        });
        rx
    }

    fn poll_bounds(&mut self) {
        let Some(rx) = &self.bounds_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(bounds)) => {
                log::info!("world bounds received: {:?}", bounds);
                self.viewport.set_bounds(Some(bounds.world_rect()));
                self.bounds_rx = None;
                self.state = LifecycleState::Running;
                self.dirty = true;
            }
            Ok(Err(e)) => {
                log::error!("world bounds fetch failed: {}", e);
                self.bounds_rx = None;
                self.state = LifecycleState::Failed;
                self.emit_error();
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::error!("world bounds fetch thread vanished");
                self.bounds_rx = None;
                self.state = LifecycleState::Failed;
                self.emit_error();
            }
        }
    }

    /// One pass of the render loop; call once per display refresh.
    ///
    /// Skips all drawing when nothing changed since the previous frame,
    /// apart from an occasional amortized cache-eviction roll, so an idle
    /// map costs almost nothing.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn RenderSurface) {
        match self.state {
            LifecycleState::Unbound => return,
            LifecycleState::Binding => {
                self.poll_bounds();
                if self.state == LifecycleState::Binding {
                    return;
                }
            }
            LifecycleState::Running | LifecycleState::Failed => {}
        }

        if let Some(focus) = self.pending_focus.take() {
            self.pin.show_at(focus, now);
            self.start_center_transition(focus, now);
        }

        self.drive_animations(now);

        if let Some(tiles) = &mut self.tiles {
            if tiles.drain_completed() {
                self.dirty = true;
            }
        }

        if !self.dirty {
            self.stats.idle += 1;
            if rand::random::<f64>() < CACHE_GC_PROBABILITY {
                if let Some(tiles) = &mut self.tiles {
                    tiles.evict(&self.viewport.visible_tiles(), self.viewport.tile_budget());
                }
            }
            return;
        }
        self.dirty = false;

        if let Some(tiles) = &mut self.tiles {
            tiles.ensure_loaded(self.viewport.visible_tiles());
        }

        surface.clear();
        let rect = self.viewport.world_rect();
        let mut ctx = DrawContext::new(surface, rect, self.viewport.scale());

        // tiles under markers under the pin
        let mut layers: Vec<&dyn Drawable> = Vec::with_capacity(3);
        if let Some(tiles) = &self.tiles {
            layers.push(tiles);
        }
        layers.push(&self.waypoints);
        layers.push(&self.pin);
        for layer in layers {
            layer.draw(&mut ctx);
        }

        self.stats.drawn += 1;
    }

    fn drive_animations(&mut self, now: Instant) {
        if let Some(transition) = &mut self.scale_transition {
            if let Some(frame) = transition.tick(now) {
                let anchor = self.viewport.center_screen();
                let applied = self.viewport.zoom_about(frame.scale, &anchor);
                if let Some(cb) = &mut self.callbacks.on_scale_change {
                    cb(applied);
                }
                self.dirty = true;
                if frame.finished {
                    self.scale_transition = None;
                }
            }
        }

        if let Some(transition) = &mut self.center_transition {
            if let Some(frame) = transition.tick(now) {
                let applied = self.viewport.set_scale(frame.scale);
                self.viewport.set_center(frame.center);
                if let Some(cb) = &mut self.callbacks.on_scale_change {
                    cb(applied);
                }
                self.dirty = true;
                if frame.finished {
                    self.center_transition = None;
                }
            }
        }

        if self.pin.update(now) {
            self.dirty = true;
        }
    }

    /// Animates the scale up one step, keeping the viewport center fixed
    pub fn zoom_in(&mut self, now: Instant) {
        self.start_scale_transition(self.viewport.scale() + ZOOM_STEP, now);
    }

    /// Animates the scale down one step
    pub fn zoom_out(&mut self, now: Instant) {
        self.start_scale_transition(self.viewport.scale() - ZOOM_STEP, now);
    }

    /// Animates back to 1:1 scale
    pub fn zoom_orig(&mut self, now: Instant) {
        self.start_scale_transition(1.0, now);
    }

    fn start_scale_transition(&mut self, target: f64, now: Instant) {
        let target = target.clamp(MIN_SCALE, MAX_SCALE);
        if let Some(mut previous) = self.scale_transition.take() {
            previous.cancel();
        }
        self.scale_transition = Some(ScaleTransition::new(self.viewport.scale(), target, now));
    }

    fn start_center_transition(&mut self, target: WorldPoint, now: Instant) {
        if let Some(mut previous) = self.center_transition.take() {
            previous.cancel();
        }
        self.center_transition = Some(CenterTransition::new(
            self.viewport.center(),
            target,
            self.viewport.scale(),
            now,
        ));
    }

    /// Shows the pin on a waypoint, recenters on it and reports the
    /// selection. Fails when the index is out of range.
    pub fn focus_point(&mut self, index: usize, now: Instant) -> Result<()> {
        let spot = self
            .waypoints
            .get(index)
            .ok_or_else(|| {
                MapError::InvalidArgument(format!("no waypoint at index {}", index))
            })?
            .clone();
        self.focus_spot(spot, now);
        Ok(())
    }

    /// Selects the world coordinate under a screen position ("select this
    /// point" context-menu action); reports a synthetic selection record.
    pub fn focus_position(&mut self, position: PointerCoord, now: Instant) {
        let world = self.viewport.screen_to_world(&position.to_screen()).floor();
        self.focus_spot(Spot::pinned(world.x, world.z), now);
    }

    fn focus_spot(&mut self, spot: Spot, now: Instant) {
        self.pin.show_at(spot.position(), now);

        // Leave room for the host's detail panel on wide viewports
        let mut target = spot.position();
        if self.viewport.size().x >= WIDE_VIEWPORT_MIN_WIDTH {
            target.x -= FOCUS_PANEL_INSET;
        }
        self.start_center_transition(target, now);

        if let Some(cb) = &mut self.callbacks.on_select_spot {
            cb(Some(&spot));
        }
        self.dirty = true;
    }

    /// Feeds one host input event through the engine
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) {
        if self.state == LifecycleState::Unbound {
            return;
        }
        match event {
            InputEvent::PointerDown { position } => self.drag.press(&position),
            InputEvent::PointerMove { position } => self.pointer_move(&position),
            InputEvent::PointerUp => self.drag.release(),
            InputEvent::Click { position } => self.click(&position, now),
            InputEvent::Wheel { delta_y, position } => self.wheel(delta_y, &position),
            InputEvent::TouchMove { touches } => match touches.as_slice() {
                [single] => self.pointer_move(single),
                [first, second, ..] => self.pinch_move(first, second),
                [] => {}
            },
            InputEvent::TouchEnd => {
                self.drag.release();
                self.pinch.end();
            }
            InputEvent::ContextMenu { position } => {
                if let Some(cb) = &mut self.callbacks.open_context_menu {
                    cb(position.to_screen());
                }
            }
            InputEvent::Resize { width, height } => {
                self.viewport
                    .set_size(crate::core::geo::ScreenPoint::new(width, height));
                self.dirty = true;
            }
        }
    }

    fn pointer_move(&mut self, position: &PointerCoord) {
        let world = self.viewport.screen_to_world(&position.to_screen());

        if let Some(cb) = &mut self.callbacks.on_cursor_move {
            cb(world.floor());
        }

        // Hover hit test in world units of the on-screen radius
        let radius = MARK_RADIUS / self.viewport.scale();
        let hit = self.waypoints.hit_test(&world, radius);
        let hit_index = hit.map(|(i, _)| i);
        if hit_index != self.hovered {
            if let Some(cb) = &mut self.callbacks.on_hover_spot {
                cb(hit.map(|(_, spot)| spot));
            }
            self.hovered = hit_index;
        }

        if let Some(delta) = self.drag.drag(position) {
            if !self.pinch.is_active() {
                self.viewport.pan_screen(&delta);
                self.dirty = true;
            }
        }
    }

    fn click(&mut self, position: &PointerCoord, now: Instant) {
        // A drag that came back to rest is not a click
        if self.drag.moved {
            return;
        }

        if let Some(cb) = &mut self.callbacks.close_context_menu {
            cb();
        }

        let world = self.viewport.screen_to_world(&position.to_screen());
        let radius = MARK_RADIUS / self.viewport.scale();
        let hit_index = self.waypoints.hit_test(&world, radius).map(|(i, _)| i);

        if let Some(index) = hit_index {
            // index came from the set, so this cannot fail
            let _ = self.focus_point(index, now);
        } else {
            self.pin.hide(now);
            self.hovered = None;
            if let Some(cb) = &mut self.callbacks.on_hover_spot {
                cb(None);
            }
            if let Some(cb) = &mut self.callbacks.on_select_spot {
                cb(None);
            }
            self.dirty = true;
        }
    }

    fn wheel(&mut self, delta_y: f64, position: &PointerCoord) {
        if let Some(mut transition) = self.scale_transition.take() {
            transition.cancel();
        }
        let target = self.viewport.scale() - delta_y / WHEEL_SCALE_DIVISOR;
        let applied = self.viewport.zoom_about(target, &position.to_screen());
        if let Some(cb) = &mut self.callbacks.on_scale_change {
            cb(applied);
        }
        self.dirty = true;
    }

    fn pinch_move(&mut self, first: &PointerCoord, second: &PointerCoord) {
        let Some(target) = self.pinch.pinch(first, second, self.viewport.scale()) else {
            return;
        };
        if let Some(mut transition) = self.scale_transition.take() {
            transition.cancel();
        }
        let anchor = self.pinch.anchor();
        let applied = self.viewport.zoom_about(target, &anchor);
        if let Some(cb) = &mut self.callbacks.on_scale_change {
            cb(applied);
        }
        self.dirty = true;
    }

    fn emit_error(&mut self) {
        if self.error_shown {
            return;
        }
        self.error_shown = true;
        if let Some(cb) = &mut self.callbacks.show_error {
            cb();
        }
    }

    /// Forces a redraw on the next tick
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn waypoints(&self) -> &WaypointSet {
        &self.waypoints
    }

    pub fn pin(&self) -> &PinOverlay {
        &self.pin
    }

    pub fn tile_cache(&self) -> Option<&TileCache> {
        self.tiles.as_ref()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::SCALE_ANIMATION_DURATION;
    use crate::core::geo::ScreenPoint;
    use crate::render::recording::RecordingSurface;
    use std::time::Duration;

    struct NoTiles;

    impl TileFetcher for NoTiles {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Err("offline".into())
        }
    }

    fn unbounded_options() -> MapOptions {
        MapOptions {
            dimension: Dimension::Nether,
            size: ScreenPoint::new(1000.0, 600.0),
            fetcher: Some(Arc::new(NoTiles)),
            ..Default::default()
        }
    }

    fn settle(map: &mut Map, from: Instant, until: Duration) {
        let mut surface = RecordingSurface::new();
        let steps = 60;
        for i in 0..=steps {
            map.tick(from + until.mul_f64(i as f64 / steps as f64), &mut surface);
        }
    }

    #[test]
    fn test_bind_twice_is_an_error() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        assert!(map.bind(unbounded_options()).is_err());
    }

    #[test]
    fn test_unbound_map_ignores_ticks_and_input() {
        let mut map = Map::new();
        let mut surface = RecordingSurface::new();
        map.tick(Instant::now(), &mut surface);
        map.handle_event(
            InputEvent::Click {
                position: PointerCoord::new(0.0, 0.0),
            },
            Instant::now(),
        );
        assert!(surface.ops().is_empty());
        assert_eq!(map.state(), LifecycleState::Unbound);
    }

    #[test]
    fn test_unbounded_dimension_runs_immediately() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        assert_eq!(map.state(), LifecycleState::Running);
        assert_eq!(
            map.viewport().offset(),
            Dimension::Nether.initial_top_left()
        );
    }

    #[test]
    fn test_unbind_returns_to_unbound() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        map.unbind();
        assert_eq!(map.state(), LifecycleState::Unbound);
        assert!(map.tile_cache().is_none());

        // rebinding after unbind is allowed
        map.bind(unbounded_options()).unwrap();
        assert_eq!(map.state(), LifecycleState::Running);
    }

    #[test]
    fn test_zoom_in_settles_exactly_one_step_up() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        let t0 = Instant::now();

        map.zoom_in(t0);
        settle(&mut map, t0, SCALE_ANIMATION_DURATION + Duration::from_millis(50));
        assert_eq!(map.viewport().scale(), 1.5);
    }

    #[test]
    fn test_zoom_clamps_at_the_top_of_the_range() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        let t0 = Instant::now();

        // walk the scale close to the limit, then step over it
        for i in 0..19 {
            map.zoom_in(t0 + Duration::from_secs(i));
            settle(
                &mut map,
                t0 + Duration::from_secs(i),
                SCALE_ANIMATION_DURATION + Duration::from_millis(50),
            );
        }
        assert_eq!(map.viewport().scale(), MAX_SCALE);
    }

    #[test]
    fn test_zoom_orig_returns_to_unit_scale() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        let t0 = Instant::now();
        map.handle_event(
            InputEvent::Wheel {
                delta_y: -400.0,
                position: PointerCoord::new(500.0, 300.0),
            },
            t0,
        );
        assert_eq!(map.viewport().scale(), 3.0);

        map.zoom_orig(t0);
        settle(&mut map, t0, SCALE_ANIMATION_DURATION + Duration::from_millis(50));
        assert_eq!(map.viewport().scale(), 1.0);
    }

    #[test]
    fn test_wheel_keeps_cursor_anchor_stationary() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        let cursor = PointerCoord::new(700.0, 150.0);
        let before = map.viewport().screen_to_world(&cursor.to_screen());

        map.handle_event(
            InputEvent::Wheel {
                delta_y: -200.0,
                position: cursor,
            },
            Instant::now(),
        );

        let after = map.viewport().screen_to_world(&cursor.to_screen());
        assert!(before.distance_to(&after) < 1.0);
        assert_eq!(map.viewport().scale(), 2.0);
    }

    #[test]
    fn test_drag_pans_the_view() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        let t0 = Instant::now();
        let start_offset = map.viewport().offset();

        map.handle_event(
            InputEvent::PointerDown {
                position: PointerCoord::new(500.0, 300.0),
            },
            t0,
        );
        map.handle_event(
            InputEvent::PointerMove {
                position: PointerCoord::new(400.0, 340.0),
            },
            t0,
        );
        map.handle_event(InputEvent::PointerUp, t0);

        let offset = map.viewport().offset();
        assert_eq!(offset.x, start_offset.x + 100.0);
        assert_eq!(offset.z, start_offset.z - 40.0);
    }

    #[test]
    fn test_focus_point_out_of_range_fails() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        assert!(map.focus_point(3, Instant::now()).is_err());
    }

    #[test]
    fn test_pinch_zooms_about_the_first_midpoint() {
        let mut map = Map::new();
        map.bind(unbounded_options()).unwrap();
        let t0 = Instant::now();

        map.handle_event(
            InputEvent::TouchMove {
                touches: vec![PointerCoord::new(400.0, 300.0), PointerCoord::new(600.0, 300.0)],
            },
            t0,
        );
        let anchor = ScreenPoint::new(500.0, 300.0);
        let before = map.viewport().screen_to_world(&anchor);

        map.handle_event(
            InputEvent::TouchMove {
                touches: vec![PointerCoord::new(300.0, 300.0), PointerCoord::new(700.0, 300.0)],
            },
            t0,
        );

        assert_eq!(map.viewport().scale(), 2.0);
        let after = map.viewport().screen_to_world(&anchor);
        assert!(before.distance_to(&after) < 1.0);

        map.handle_event(InputEvent::TouchEnd, t0);
    }
}
