//! Loader/cache integration: URL shapes, retry behavior and the
//! channel hand-off back to the frame loop.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chunkview::core::geo::{TileCoord, TileRange};
use chunkview::tiles::{GridTileSource, TileCache, TileFetcher};
use chunkview::Dimension;

fn png_bytes() -> Vec<u8> {
    let raster = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(raster)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

/// Records every requested URL and serves the same PNG
struct RecordingFetcher {
    urls: Mutex<Vec<String>>,
    tile: Vec<u8>,
}

impl TileFetcher for RecordingFetcher {
    fn fetch(&self, url: &str) -> chunkview::Result<Vec<u8>> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.tile.clone())
    }
}

/// Fails the first attempt of every URL, succeeds afterwards
struct FlakyFetcher {
    attempts: AtomicUsize,
    tile: Vec<u8>,
}

impl TileFetcher for FlakyFetcher {
    fn fetch(&self, _url: &str) -> chunkview::Result<Vec<u8>> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err("transient failure".into());
        }
        Ok(self.tile.clone())
    }
}

/// Serves bytes that are not a decodable image
struct GarbageFetcher;

impl TileFetcher for GarbageFetcher {
    fn fetch(&self, _url: &str) -> chunkview::Result<Vec<u8>> {
        Ok(b"not a png".to_vec())
    }
}

fn wait_until(cache: &mut TileCache, mut done: impl FnMut(&TileCache) -> bool) {
    for _ in 0..400 {
        cache.drain_completed();
        if done(cache) {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("pipeline never settled");
}

#[test]
fn loader_requests_grid_urls_for_the_range() {
    let fetcher = Arc::new(RecordingFetcher {
        urls: Mutex::new(Vec::new()),
        tile: png_bytes(),
    });
    let mut cache = TileCache::new(
        GridTileSource::new("https://example.net/map", Dimension::End),
        Arc::clone(&fetcher) as Arc<dyn TileFetcher>,
    );

    cache.ensure_loaded(TileRange::new(TileCoord::new(-1, 0), TileCoord::new(0, 0)));
    wait_until(&mut cache, |c| {
        c.is_loaded(&TileCoord::new(-1, 0)) && c.is_loaded(&TileCoord::new(0, 0))
    });

    let mut urls = fetcher.urls.lock().unwrap().clone();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://example.net/map/end/-1,0.png".to_string(),
            "https://example.net/map/end/0,0.png".to_string(),
        ]
    );
}

#[test]
fn transient_failures_are_retried_once() {
    let fetcher = Arc::new(FlakyFetcher {
        attempts: AtomicUsize::new(0),
        tile: png_bytes(),
    });
    let mut cache = TileCache::new(
        GridTileSource::new("/map", Dimension::Overworld),
        Arc::clone(&fetcher) as Arc<dyn TileFetcher>,
    );

    let coord = TileCoord::new(5, 5);
    cache.ensure_loaded(TileRange::new(coord, coord));
    wait_until(&mut cache, |c| c.is_loaded(&coord));

    assert_eq!(fetcher.attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn undecodable_tiles_end_up_blank_not_crashed() {
    let mut cache = TileCache::new(
        GridTileSource::new("/map", Dimension::Overworld),
        Arc::new(GarbageFetcher),
    );

    let coord = TileCoord::new(0, 0);
    cache.ensure_loaded(TileRange::new(coord, coord));
    wait_until(&mut cache, |c| !c.is_pending(&coord));

    assert!(cache.contains(&coord));
    assert!(!cache.is_loaded(&coord));
}

#[test]
fn results_for_evicted_tiles_are_dropped_quietly() {
    let mut cache = TileCache::new(
        GridTileSource::new("/map", Dimension::Overworld),
        Arc::new(RecordingFetcher {
            urls: Mutex::new(Vec::new()),
            tile: png_bytes(),
        }),
    );

    let stale = TileCoord::new(0, 0);
    cache.ensure_loaded(TileRange::new(stale, stale));

    // scroll far away and evict before the load lands
    let visible = TileRange::new(TileCoord::new(50, 50), TileCoord::new(51, 51));
    cache.ensure_loaded(visible);
    cache.evict(&visible, 4);
    assert!(!cache.contains(&stale));

    wait_until(&mut cache, |c| {
        visible.iter().all(|coord| c.is_loaded(&coord))
    });
    assert!(!cache.contains(&stale));
    assert_eq!(cache.len(), 4);
}
