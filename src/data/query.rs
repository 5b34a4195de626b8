//! URL query parsing for the map's read-only inputs: the dimension
//! selector and an optional coordinate to pre-focus on load.

use crate::core::geo::{Dimension, WorldPoint};

/// View parameters carried in the page URL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewQuery {
    pub dimension: Dimension,
    /// Present when both `x` and `z` parameters parse
    pub focus: Option<WorldPoint>,
}

/// Returns the raw value of `name` in a query string, with or without the
/// leading `?`. A key without `=` yields an empty value.
pub fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = match pair.find('=') {
            Some(at) => (&pair[..at], &pair[at + 1..]),
            None => (pair, ""),
        };
        (key == name).then_some(value)
    })
}

/// Parses the dimension and optional pre-focus coordinate
pub fn parse_view_query(query: &str) -> ViewQuery {
    let dimension = query_param(query, "dimen")
        .map(Dimension::from_name)
        .unwrap_or_default();

    let focus = match (
        query_param(query, "x").and_then(|v| v.parse::<i64>().ok()),
        query_param(query, "z").and_then(|v| v.parse::<i64>().ok()),
    ) {
        (Some(x), Some(z)) => Some(WorldPoint::new(x as f64, z as f64)),
        _ => None,
    };

    ViewQuery { dimension, focus }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_lookup() {
        assert_eq!(query_param("?a=1&b=2", "b"), Some("2"));
        assert_eq!(query_param("a=1&b=2", "a"), Some("1"));
        assert_eq!(query_param("?flag&x=3", "flag"), Some(""));
        assert_eq!(query_param("?a=1", "missing"), None);
    }

    #[test]
    fn test_full_view_query() {
        let view = parse_view_query("?dimen=nether&x=100&z=-250");
        assert_eq!(view.dimension, Dimension::Nether);
        assert_eq!(view.focus, Some(WorldPoint::new(100.0, -250.0)));
    }

    #[test]
    fn test_defaults_when_absent() {
        let view = parse_view_query("");
        assert_eq!(view.dimension, Dimension::Overworld);
        assert_eq!(view.focus, None);
    }

    #[test]
    fn test_focus_requires_both_coordinates() {
        assert_eq!(parse_view_query("?x=100").focus, None);
        assert_eq!(parse_view_query("?x=100&z=abc").focus, None);
    }

    #[test]
    fn test_unknown_dimension_falls_back_to_overworld() {
        assert_eq!(
            parse_view_query("?dimen=moon").dimension,
            Dimension::Overworld
        );
    }
}
