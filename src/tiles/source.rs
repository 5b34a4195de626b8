use once_cell::sync::Lazy;
use reqwest::blocking::Client;

use crate::core::geo::{Dimension, TileCoord};
use crate::Result;

/// Shared blocking HTTP client with a custom User-Agent so that tile
/// servers don't reject the request. Building the client once avoids the
/// cost of TLS and connection pool setup for every tile.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("chunkview/0.1 (+https://github.com/example/chunkview)")
        .build()
        .expect("failed to build reqwest blocking client")
});

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Addresses the world-map tile service:
/// `{prefix}/{dimension}/{x},{y}.png` plus a `chunk_range.json` sibling
/// describing the scrollable range of bounded dimensions.
#[derive(Debug, Clone)]
pub struct GridTileSource {
    prefix: String,
    dimension: Dimension,
}

impl GridTileSource {
    pub fn new(prefix: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            prefix: prefix.into(),
            dimension,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// URL of the dimension's scrollable-range descriptor
    pub fn bounds_url(&self) -> String {
        format!("{}/{}/chunk_range.json", self.prefix, self.dimension.name())
    }
}

impl TileSource for GridTileSource {
    fn url(&self, coord: TileCoord) -> String {
        format!(
            "{}/{}/{},{}.png",
            self.prefix,
            self.dimension.name(),
            coord.x,
            coord.y
        )
    }
}

/// Transport used to retrieve tile and metadata bytes.
///
/// The engine only ever sees this trait, so hosts and tests can substitute
/// an in-memory implementation; the default goes over HTTP.
pub trait TileFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches over the shared blocking HTTP client.
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl TileFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let resp = HTTP_CLIENT.get(url).send()?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()).into());
        }
        let bytes = resp.bytes()?;
        Ok(bytes.to_vec())
    }
}
