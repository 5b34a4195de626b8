use std::collections::VecDeque;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use fxhash::FxHashMap;

use crate::core::constants::TILE_SIZE;
use crate::core::geo::{ScreenRect, TileCoord, TileRange};
use crate::layers::base::Drawable;
use crate::render::context::DrawContext;
use crate::render::surface::TileImage;
use crate::tiles::loader::{TileFetch, TileLoader};
use crate::tiles::source::{GridTileSource, TileFetcher, TileSource};

/// Lifecycle of one cached tile
#[derive(Debug)]
pub enum TileSlot {
    /// Load started, image not here yet; draws nothing
    Pending,
    Loaded(TileImage),
    /// Both load attempts failed; stays blank
    Failed,
}

/// Keyed store of the tiles covering the currently relevant index range.
///
/// Tiles enter when they scroll into view, load asynchronously, and are
/// evicted oldest-inserted-first once the cache outgrows what one screen
/// needs. Eviction never removes a tile that still intersects the visible
/// range, even if that momentarily leaves the cache over budget.
pub struct TileCache {
    slots: FxHashMap<TileCoord, TileSlot>,
    /// Insertion order; front is oldest
    order: VecDeque<TileCoord>,
    loader: TileLoader,
    results: Receiver<TileFetch>,
    source: GridTileSource,
    fetcher: Arc<dyn TileFetcher>,
}

impl TileCache {
    pub fn new(source: GridTileSource, fetcher: Arc<dyn TileFetcher>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            slots: FxHashMap::default(),
            order: VecDeque::new(),
            loader: TileLoader::new(tx),
            results: rx,
            source,
            fetcher,
        }
    }

    /// Begins a load for every tile in `range` not already tracked
    pub fn ensure_loaded(&mut self, range: TileRange) {
        for coord in range.iter() {
            if self.slots.contains_key(&coord) {
                continue;
            }
            self.slots.insert(coord, TileSlot::Pending);
            self.order.push_back(coord);
            let url = self.source.url(coord);
            self.loader
                .start_download(Arc::clone(&self.fetcher), coord, url);
        }
    }

    /// Applies finished background loads. Returns true when at least one
    /// tile became drawable, meaning the frame needs a redraw.
    pub fn drain_completed(&mut self) -> bool {
        let mut loaded_any = false;
        while let Ok(fetch) = self.results.try_recv() {
            // A slot evicted while its load was in flight is simply dropped
            if let Some(slot) = self.slots.get_mut(&fetch.coord) {
                match fetch.image {
                    Some(image) => {
                        *slot = TileSlot::Loaded(image);
                        loaded_any = true;
                    }
                    None => *slot = TileSlot::Failed,
                }
            }
        }
        loaded_any
    }

    /// Drops oldest-inserted tiles until at most `budget` remain, skipping
    /// tiles inside `visible`.
    pub fn evict(&mut self, visible: &TileRange, budget: usize) {
        if self.order.len() <= budget {
            return;
        }

        let mut survivors = VecDeque::new();
        while self.order.len() + survivors.len() > budget {
            match self.order.pop_front() {
                Some(coord) if visible.contains(&coord) => survivors.push_back(coord),
                Some(coord) => {
                    self.slots.remove(&coord);
                }
                None => break,
            }
        }
        while let Some(coord) = survivors.pop_back() {
            self.order.push_front(coord);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.slots.contains_key(coord)
    }

    pub fn is_loaded(&self, coord: &TileCoord) -> bool {
        matches!(self.slots.get(coord), Some(TileSlot::Loaded(_)))
    }

    pub fn is_pending(&self, coord: &TileCoord) -> bool {
        matches!(self.slots.get(coord), Some(TileSlot::Pending))
    }
}

impl Drawable for TileCache {
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let scale = ctx.map_scale();
        let rect = *ctx.rect();
        let extent = (TILE_SIZE * scale).ceil();

        for coord in &self.order {
            let Some(TileSlot::Loaded(image)) = self.slots.get(coord) else {
                continue;
            };
            if image.is_empty() {
                continue;
            }

            let dst = ScreenRect::new(
                ((coord.x as f64 * TILE_SIZE - rect.left) * scale).floor(),
                ((coord.y as f64 * TILE_SIZE - rect.top) * scale).floor(),
                extent,
                extent,
            );
            ctx.surface().draw_tile(image, dst);
        }
    }
}
