use std::sync::Arc;

use crate::core::geo::{Dimension, ScreenPoint, WorldPoint};
use crate::layers::waypoints::Spot;
use crate::tiles::source::TileFetcher;

/// Host hooks the engine calls as the user works the map.
///
/// Every hook is optional; the engine checks and skips absent ones. This
/// is the whole outward surface toward the UI layer: search boxes, detail
/// panels and context menus live on the host side and react to these.
#[derive(Default)]
pub struct MapCallbacks {
    /// Pointer rests on (or leaves) a waypoint; fires on change
    pub on_hover_spot: Option<Box<dyn FnMut(Option<&Spot>)>>,
    /// A waypoint or arbitrary coordinate was selected, or the selection
    /// was cleared
    pub on_select_spot: Option<Box<dyn FnMut(Option<&Spot>)>>,
    /// The view scale changed, animated or not
    pub on_scale_change: Option<Box<dyn FnMut(f64)>>,
    /// The pointer moved; reports the world coordinate under it
    pub on_cursor_move: Option<Box<dyn FnMut(WorldPoint)>>,
    /// Right-click or long-press at a screen position
    pub open_context_menu: Option<Box<dyn FnMut(ScreenPoint)>>,
    /// Any click; hosts dismiss an open menu here
    pub close_context_menu: Option<Box<dyn FnMut()>>,
    /// A required fetch failed; fired at most once
    pub show_error: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for MapCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCallbacks")
            .field("on_hover_spot", &self.on_hover_spot.is_some())
            .field("on_select_spot", &self.on_select_spot.is_some())
            .field("on_scale_change", &self.on_scale_change.is_some())
            .field("on_cursor_move", &self.on_cursor_move.is_some())
            .field("open_context_menu", &self.open_context_menu.is_some())
            .field("close_context_menu", &self.close_context_menu.is_some())
            .field("show_error", &self.show_error.is_some())
            .finish()
    }
}

/// One-time configuration handed to [`crate::Map::bind`].
pub struct MapOptions {
    pub dimension: Dimension,
    /// Base path of the tile service, e.g. `/map` or a full URL
    pub tile_prefix: String,
    /// Points of interest for this dimension, fetched by the host
    pub spots: Vec<Spot>,
    /// Initial canvas size in pixels
    pub size: ScreenPoint,
    /// Coordinate to focus right after binding (from the page URL)
    pub initial_focus: Option<WorldPoint>,
    pub callbacks: MapCallbacks,
    /// Transport override; defaults to the shared HTTP client
    pub fetcher: Option<Arc<dyn TileFetcher>>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            dimension: Dimension::Overworld,
            tile_prefix: "/map".to_string(),
            spots: Vec::new(),
            size: ScreenPoint::new(800.0, 600.0),
            initial_focus: None,
            callbacks: MapCallbacks::default(),
            fetcher: None,
        }
    }
}

impl std::fmt::Debug for MapOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapOptions")
            .field("dimension", &self.dimension)
            .field("tile_prefix", &self.tile_prefix)
            .field("spots", &self.spots.len())
            .field("size", &self.size)
            .field("initial_focus", &self.initial_focus)
            .field("callbacks", &self.callbacks)
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = MapOptions::default();
        assert_eq!(options.dimension, Dimension::Overworld);
        assert_eq!(options.tile_prefix, "/map");
        assert!(options.spots.is_empty());
        assert!(options.initial_focus.is_none());
        assert!(options.fetcher.is_none());
    }
}
