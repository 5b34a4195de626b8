use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;

use crate::core::geo::TileCoord;
use crate::render::surface::TileImage;
use crate::tiles::source::TileFetcher;
use crate::Result;

/// Outcome of one background tile load. `image` is `None` when the fetch
/// or decode failed for good; the slot stays blank.
#[derive(Debug)]
pub struct TileFetch {
    pub coord: TileCoord,
    pub image: Option<TileImage>,
}

/// Fetches tiles on detached background threads and reports the decoded
/// rasters back over a channel.
///
/// The channel is the only bridge back to the frame loop: worker threads
/// never touch cache state, the cache drains completions on its own tick.
pub struct TileLoader {
    tx: Sender<TileFetch>,
}

impl TileLoader {
    /// Create a new tile loader given a sender to report completed downloads.
    pub fn new(tx: Sender<TileFetch>) -> Self {
        Self { tx }
    }

    /// Start downloading the specified tile. The download occurs on a
    /// detached thread so that it does not block the caller. When the
    /// request finishes, the sender receives the result; a receiver that
    /// has gone away makes the send a no-op.
    pub fn start_download(&self, fetcher: Arc<dyn TileFetcher>, coord: TileCoord, url: String) {
        let tx = self.tx.clone();

        thread::spawn(move || {
            const MAX_ATTEMPTS: usize = 2;
            for attempt in 1..=MAX_ATTEMPTS {
                log::debug!("fetch tile {:?} attempt {}", coord, attempt);
                let result: Result<TileImage> = fetcher
                    .fetch(&url)
                    .and_then(|bytes| TileImage::from_bytes(&bytes));

                match result {
                    Ok(image) => {
                        log::info!(
                            "loaded tile {:?} ({}x{})",
                            coord,
                            image.width(),
                            image.height()
                        );
                        let _ = tx.send(TileFetch {
                            coord,
                            image: Some(image),
                        });
                        return;
                    }
                    Err(e) => {
                        log::warn!("tile {:?} load failed on attempt {}: {}", coord, attempt, e);
                        if attempt == MAX_ATTEMPTS {
                            log::error!("giving up on tile {:?}", coord);
                            let _ = tx.send(TileFetch { coord, image: None });
                        } else {
                            thread::sleep(std::time::Duration::from_millis(100));
                        }
                    }
                }
            }
        });
    }
}
