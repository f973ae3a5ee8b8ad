use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::marker::{MarkerKind, WorldMarker};

pub type WorldId = u32;
pub type TextId = u32;

/// Game-map row coverage per map column x. Columns without maps are simply
/// absent from the table.
pub type MapsRanges = HashMap<i32, Vec<RowRange>>;

/// External map id -> game cell, for worlds whose maps have known identities.
pub type CellIndex = HashMap<String, CellPoint>;

/// Rendering geometry shared by every world of a world set.
///
/// All pixel dimensions describe one game map at full resolution (max zoom).
/// A display amplification factor may be folded in once via [`WorldConfig::amplified`];
/// after that the config never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldConfig {
    pub tile_size: f64,
    pub map_img_width: f64,
    pub map_img_height: f64,
    #[serde(default)]
    pub map_overlay_side: f64,
    #[serde(default)]
    pub map_overlay_bottom: f64,
    pub max_zoom: i32,
    pub start_world_id: WorldId,
}

impl WorldConfig {
    /// Scale every pixel dimension by the display amplification factor.
    pub fn amplified(mut self, factor: f64) -> Self {
        self.tile_size *= factor;
        self.map_img_width *= factor;
        self.map_img_height *= factor;
        self.map_overlay_side *= factor;
        self.map_overlay_bottom *= factor;
        self
    }
}

/// One navigable world and everything needed to decide what it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    pub id: WorldId,
    pub name_id: TextId,
    pub min_zoom: i32,
    #[serde(default)]
    pub start_position: Option<StartPosition>,
    /// Whether a pre-rendered world map pyramid exists for low zooms.
    #[serde(default)]
    pub has_world_map: bool,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub maps_ranges: MapsRanges,
    #[serde(default)]
    pub markers: HashMap<MarkerKind, Vec<WorldMarker>>,
}

impl World {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("world parse error: {e}"))
    }

    /// True when a game map sits at column `x`, row `y`.
    pub fn has_map_at(&self, x: i32, y: i32) -> bool {
        self.maps_ranges
            .get(&x)
            .is_some_and(|ranges| ranges.iter().any(|range| range.contains(y)))
    }
}

/// Extent of the world-map tile pyramid at its native max zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub max_zoom: i32,
    pub tile_min_x: i32,
    pub tile_max_x: i32,
    pub tile_min_y: i32,
    pub tile_max_y: i32,
}

/// Inclusive row span within one map column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub y_min: i32,
    pub y_max: i32,
}

impl RowRange {
    pub const fn contains(&self, y: i32) -> bool {
        y >= self.y_min && y <= self.y_max
    }
}

/// Initial camera placement for a world, in fractional game coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPosition {
    pub x: f64,
    pub y: f64,
    pub zoom: i32,
}

/// A single game cell addressed by integer map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPoint {
    pub x: i32,
    pub y: i32,
}

/// Catalog entry for the world picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSummary {
    pub id: WorldId,
    pub name_id: TextId,
}

/// Startup payload: the selectable worlds plus their shared config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldCatalog {
    pub worlds: Vec<WorldSummary>,
    pub config: WorldConfig,
}

impl WorldCatalog {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("world catalog parse error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerKind;

    #[test]
    fn world_parses_from_wire_shape() {
        let raw = r#"{
            "id": 3,
            "nameId": 120,
            "minZoom": 1,
            "hasWorldMap": true,
            "dimensions": {"maxZoom": 4, "tileMinX": -2, "tileMaxX": 5, "tileMinY": 0, "tileMaxY": 7},
            "mapsRanges": {"5": [{"y_min": 10, "y_max": 20}], "-3": [{"y_min": -4, "y_max": -1}]},
            "startPosition": {"x": 0.5, "y": 12.0, "zoom": 3},
            "markers": {
                "type4": [{"x": 1.0, "y": 2.0, "titleId": 9, "worldId": 7, "toX": 3.0, "toY": 4.0, "zoom": 2}],
                "type99": [{"x": 0.0, "y": 0.0}]
            }
        }"#;

        let world = World::from_json(raw).unwrap();
        assert_eq!(world.id, 3);
        assert_eq!(world.name_id, 120);
        assert_eq!(world.dimensions.tile_min_x, -2);
        assert_eq!(world.maps_ranges[&5], vec![RowRange { y_min: 10, y_max: 20 }]);
        assert_eq!(world.maps_ranges[&-3].len(), 1);
        assert_eq!(world.markers[&MarkerKind::Teleport].len(), 1);
        // Unrecognized categories survive as Unknown instead of failing the parse.
        assert_eq!(world.markers[&MarkerKind::Unknown].len(), 1);
    }

    #[test]
    fn world_defaults_cover_optional_fields() {
        let world = World::from_json(r#"{"id": 1, "nameId": 2, "minZoom": 0}"#).unwrap();
        assert!(!world.has_world_map);
        assert!(world.start_position.is_none());
        assert!(world.maps_ranges.is_empty());
        assert!(world.markers.is_empty());
        assert_eq!(world.dimensions, Dimensions::default());
    }

    #[test]
    fn has_map_at_honors_inclusive_edges_and_absent_columns() {
        let world = World::from_json(
            r#"{"id": 1, "nameId": 2, "minZoom": 0,
                "mapsRanges": {"5": [{"y_min": 10, "y_max": 20}]}}"#,
        )
        .unwrap();

        assert!(world.has_map_at(5, 10));
        assert!(world.has_map_at(5, 15));
        assert!(world.has_map_at(5, 20));
        assert!(!world.has_map_at(5, 9));
        assert!(!world.has_map_at(5, 21));
        assert!(!world.has_map_at(7, 15));
    }

    #[test]
    fn amplified_scales_every_pixel_dimension() {
        let cfg = WorldConfig {
            tile_size: 256.0,
            map_img_width: 100.0,
            map_img_height: 80.0,
            map_overlay_side: 10.0,
            map_overlay_bottom: 6.0,
            max_zoom: 5,
            start_world_id: 1,
        };

        let amplified = cfg.amplified(2.0);
        assert_eq!(amplified.tile_size, 512.0);
        assert_eq!(amplified.map_img_width, 200.0);
        assert_eq!(amplified.map_img_height, 160.0);
        assert_eq!(amplified.map_overlay_side, 20.0);
        assert_eq!(amplified.map_overlay_bottom, 12.0);
        assert_eq!(amplified.max_zoom, 5);
    }

    #[test]
    fn catalog_parses_config_and_world_list() {
        let raw = r#"{
            "worlds": [{"id": 1, "nameId": 100}, {"id": 2, "nameId": 101}],
            "config": {"tileSize": 256, "mapImgWidth": 100, "mapImgHeight": 80,
                       "mapOverlaySide": 10, "mapOverlayBottom": 6,
                       "maxZoom": 5, "startWorldId": 1}
        }"#;

        let catalog = WorldCatalog::from_json(raw).unwrap();
        assert_eq!(catalog.worlds.len(), 2);
        assert_eq!(catalog.config.start_world_id, 1);
        assert_eq!(catalog.config.tile_size, 256.0);
    }
}
