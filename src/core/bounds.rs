use serde::{Deserialize, Serialize};

use crate::core::constants::TILE_SIZE;
use crate::core::geo::{TileCoord, WorldRect};

/// Finite scrollable tile range of a bounded dimension.
///
/// The tile service publishes this as `chunk_range.json`, a four-integer
/// array `[min_tile_x, min_tile_y, tile_count_x, tile_count_y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct TileBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub count_x: i32,
    pub count_y: i32,
}

impl TileBounds {
    pub fn new(min_x: i32, min_y: i32, count_x: i32, count_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            count_x,
            count_y,
        }
    }

    /// Parses the raw `chunk_range.json` payload
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// World-space rect covered by the bounded tile range
    pub fn world_rect(&self) -> WorldRect {
        let left = self.min_x as f64 * TILE_SIZE;
        let top = self.min_y as f64 * TILE_SIZE;
        WorldRect::new(
            left,
            top,
            left + self.count_x as f64 * TILE_SIZE,
            top + self.count_y as f64 * TILE_SIZE,
        )
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        coord.x >= self.min_x
            && coord.x < self.min_x + self.count_x
            && coord.y >= self.min_y
            && coord.y < self.min_y + self.count_y
    }
}

impl From<[i32; 4]> for TileBounds {
    fn from(raw: [i32; 4]) -> Self {
        Self::new(raw[0], raw[1], raw[2], raw[3])
    }
}

impl From<TileBounds> for [i32; 4] {
    fn from(bounds: TileBounds) -> Self {
        [bounds.min_x, bounds.min_y, bounds.count_x, bounds.count_y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_chunk_range_payload() {
        let bounds = TileBounds::from_json(b"[-4, -2, 8, 6]").unwrap();
        assert_eq!(bounds, TileBounds::new(-4, -2, 8, 6));
    }

    #[test]
    fn test_world_rect_spans_tile_range() {
        let bounds = TileBounds::new(-2, -1, 4, 2);
        let rect = bounds.world_rect();
        assert_eq!(rect.left, -1024.0);
        assert_eq!(rect.top, -512.0);
        assert_eq!(rect.right, 1024.0);
        assert_eq!(rect.bottom, 512.0);
    }

    #[test]
    fn test_contains_tile() {
        let bounds = TileBounds::new(0, 0, 2, 2);
        assert!(bounds.contains(&TileCoord::new(1, 1)));
        assert!(!bounds.contains(&TileCoord::new(2, 0)));
        assert!(!bounds.contains(&TileCoord::new(-1, 0)));
    }
}
