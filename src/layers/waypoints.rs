use serde::{Deserialize, Serialize};

use crate::core::constants::MARK_RADIUS;
use crate::core::geo::{ScreenRect, WorldPoint};
use crate::layers::base::Drawable;
use crate::render::color::{self, Color};
use crate::render::context::DrawContext;
use crate::render::surface::MarkerIcon;

/// Marker type: a bare label, no circle
pub const KIND_LABEL: i32 = 1;
/// Marker type: circular marker with a train icon
pub const KIND_TRAIN: i32 = 2;
/// Marker type: circular marker with a subway icon
pub const KIND_SUBWAY: i32 = 3;

const LABEL_FONT_SIZE: f64 = 24.0;
const ICON_EXTENT: f64 = 14.0;

/// A point of interest, as served by `/api/points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: i32,
    pub x: f64,
    pub z: f64,
    pub name: String,
    /// Phonetic reading used as a secondary search key
    #[serde(default)]
    pub hira: Option<String>,
    /// Marker fill as a `#rrggbb` string
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Spot {
    /// Synthetic selection record for an arbitrary coordinate picked via
    /// the context menu
    pub fn pinned(x: f64, z: f64) -> Self {
        Self {
            id: -1,
            kind: KIND_LABEL,
            x,
            z,
            name: "Selected point".to_string(),
            hira: None,
            color: None,
            detail: None,
            image: None,
        }
    }

    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.z)
    }

    pub fn is_label(&self) -> bool {
        self.kind == KIND_LABEL
    }

    pub fn icon(&self) -> Option<MarkerIcon> {
        match self.kind {
            KIND_TRAIN => Some(MarkerIcon::Train),
            KIND_SUBWAY => Some(MarkerIcon::Subway),
            _ => None,
        }
    }

    /// Marker fill color, falling back to the engine default
    pub fn fill_color(&self) -> Color {
        self.color
            .as_deref()
            .and_then(Color::from_hex)
            .unwrap_or(color::MARKER_DEFAULT)
    }
}

/// The per-dimension list of points of interest.
///
/// Owned by the engine for the lifetime of one dimension's view and
/// replaced wholesale on dimension change. The list is small and static,
/// so hit-testing is a linear scan.
#[derive(Debug, Clone, Default)]
pub struct WaypointSet {
    spots: Vec<Spot>,
}

impl WaypointSet {
    pub fn new(spots: Vec<Spot>) -> Self {
        Self { spots }
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Spot> {
        self.spots.get(index)
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    /// Nearest spot within `radius` world units of `point`, if any
    pub fn hit_test(&self, point: &WorldPoint, radius: f64) -> Option<(usize, &Spot)> {
        let radius_sq = radius * radius;
        self.spots
            .iter()
            .enumerate()
            .filter_map(|(i, spot)| {
                let dx = spot.x - point.x;
                let dz = spot.z - point.z;
                let dist_sq = dx * dx + dz * dz;
                (dist_sq <= radius_sq).then_some((i, spot, dist_sq))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(i, spot, _)| (i, spot))
    }

    /// Case-sensitive substring match over name and phonetic reading.
    /// An empty query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> Vec<(usize, &'a Spot)> {
        self.spots
            .iter()
            .enumerate()
            .filter(|(_, spot)| {
                spot.name.contains(query)
                    || spot.hira.as_deref().is_some_and(|h| h.contains(query))
            })
            .collect()
    }

    fn draw_spot(&self, spot: &Spot, ctx: &mut DrawContext<'_>) {
        let at = ctx.world_to_screen(&spot.position());

        if spot.is_label() {
            let width = ctx.surface().measure_text(&spot.name, LABEL_FONT_SIZE);
            ctx.surface().fill_text(
                &spot.name,
                crate::core::geo::ScreenPoint::new(at.x - width / 2.0 + 2.0, at.y + 2.0),
                LABEL_FONT_SIZE,
                color::BLACK.with_alpha(0.6),
            );
            ctx.surface().fill_text(
                &spot.name,
                crate::core::geo::ScreenPoint::new(at.x - width / 2.0, at.y),
                LABEL_FONT_SIZE,
                color::WHITE.with_alpha(0.6),
            );
            return;
        }

        // drop shadow, then the marker itself
        ctx.surface().fill_circle(
            crate::core::geo::ScreenPoint::new(at.x + 1.0, at.y + 1.0),
            MARK_RADIUS,
            color::BLACK.with_alpha(0.3),
        );
        let fill = spot.fill_color();
        ctx.surface().fill_circle(at, MARK_RADIUS, fill);

        if let Some(icon) = spot.icon() {
            let inset = MARK_RADIUS * 0.7;
            ctx.surface().draw_marker_icon(
                icon,
                fill.is_dark(),
                ScreenRect::new(at.x - inset, at.y - inset, ICON_EXTENT, ICON_EXTENT),
            );
        }
    }
}

impl Drawable for WaypointSet {
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let in_range = ctx.rect().expanded(MARK_RADIUS);
        for spot in &self.spots {
            if in_range.contains(&spot.position()) {
                self.draw_spot(spot, ctx);
            }
        }
    }
}
