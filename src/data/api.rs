//! Host-side helpers for the backing JSON service.
//!
//! The engine itself never calls these; the host fetches the bootstrap
//! state and point list up front and hands them to [`crate::MapOptions`].
//! Parsing is split from fetching so the wire shapes stay testable.

use serde::{Deserialize, Serialize};

use crate::core::geo::Dimension;
use crate::layers::waypoints::Spot;
use crate::tiles::source::HTTP_CLIENT;
use crate::Result;

/// Bootstrap payload from `/api/initial_state.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    /// Base path for tile requests
    pub prefix: String,
}

pub fn parse_initial_state(bytes: &[u8]) -> Result<InitialState> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn parse_spots(bytes: &[u8]) -> Result<Vec<Spot>> {
    Ok(serde_json::from_slice(bytes)?)
}

fn get_bytes(url: &str) -> Result<Vec<u8>> {
    log::debug!("fetch {}", url);
    let resp = HTTP_CLIENT.get(url).send()?;
    if !resp.status().is_success() {
        return Err(format!("HTTP {}", resp.status()).into());
    }
    Ok(resp.bytes()?.to_vec())
}

/// Fetches the bootstrap state from the API service at `base`
pub fn fetch_initial_state(base: &str) -> Result<InitialState> {
    parse_initial_state(&get_bytes(&format!("{}/api/initial_state.json", base))?)
}

/// Fetches the point-of-interest list for one dimension
pub fn fetch_spots(base: &str, dimension: Dimension) -> Result<Vec<Spot>> {
    parse_spots(&get_bytes(&format!(
        "{}/api/points?dimen={}",
        base,
        dimension.name()
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initial_state() {
        let state = parse_initial_state(br#"{"prefix": "/map"}"#).unwrap();
        assert_eq!(state.prefix, "/map");
    }

    #[test]
    fn test_parse_spot_list() {
        let spots = parse_spots(
            r##"[
                {"id": 1, "type": 1, "x": 0, "z": 0, "name": "Spawn"},
                {"id": 2, "type": 3, "x": -300, "z": 128, "name": "Metro",
                 "hira": "めとろ", "color": "#123456", "detail": "line 1", "image": "metro.png"}
            ]"##
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].name, "Spawn");
        assert_eq!(spots[1].hira.as_deref(), Some("めとろ"));
        assert_eq!(spots[1].image.as_deref(), Some("metro.png"));
    }

    #[test]
    fn test_parse_rejects_malformed_payload() {
        assert!(parse_spots(b"{\"not\": \"a list\"}").is_err());
    }
}
