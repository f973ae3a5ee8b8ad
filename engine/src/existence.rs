//! Tile existence decisions.
//!
//! A tile is worth fetching only when some game map overlaps it. Worlds with
//! a pre-rendered world map answer low zooms from the pyramid extent; every
//! other case scans the per-column map ranges under the tile's footprint.

use meridian_shared::coords;
use meridian_shared::{Dimensions, World, WorldConfig};

/// Whether any map content sits under tile (x, y) at `zoom`.
pub fn tile_exists(world: &World, cfg: &WorldConfig, zoom: i32, x: i32, y: i32) -> bool {
    if world.has_world_map && zoom <= world.dimensions.max_zoom {
        let (min_x, max_x, min_y, max_y) = pyramid_bounds(zoom, &world.dimensions);
        return x >= min_x && x <= max_x && y >= min_y && y <= max_y;
    }

    let (col_min, col_max) = coords::tile_column_range(x, zoom, cfg);
    let (row_min, row_max) = coords::tile_row_range(y, zoom, cfg);
    for col in col_min..=col_max {
        for row in row_min..=row_max {
            if world.has_map_at(col, row) {
                return true;
            }
        }
    }
    false
}

/// World-map pyramid extent scaled down from its native max zoom.
fn pyramid_bounds(zoom: i32, dims: &Dimensions) -> (i32, i32, i32, i32) {
    let sf = coords::scaling_factor(zoom, dims.max_zoom);
    (
        (dims.tile_min_x as f64 * sf).floor() as i32,
        (dims.tile_max_x as f64 * sf).floor() as i32,
        (dims.tile_min_y as f64 * sf).floor() as i32,
        (dims.tile_max_y as f64 * sf).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_shared::World;

    fn cfg() -> WorldConfig {
        WorldConfig {
            tile_size: 64.0,
            map_img_width: 64.0,
            map_img_height: 64.0,
            map_overlay_side: 0.0,
            map_overlay_bottom: 0.0,
            max_zoom: 5,
            start_world_id: 1,
        }
    }

    fn ranged_world() -> World {
        World::from_json(
            r#"{"id": 1, "nameId": 2, "minZoom": 0,
                "mapsRanges": {"5": [{"y_min": 10, "y_max": 20}]}}"#,
        )
        .unwrap()
    }

    fn pyramid_world() -> World {
        World::from_json(
            r#"{"id": 1, "nameId": 2, "minZoom": 0, "hasWorldMap": true,
                "dimensions": {"maxZoom": 3, "tileMinX": -4, "tileMaxX": 7,
                               "tileMinY": 0, "tileMaxY": 5}}"#,
        )
        .unwrap()
    }

    #[test]
    fn range_scan_finds_covered_columns() {
        let world = ranged_world();
        let cfg = cfg();

        // Tile column 5 at max zoom covers map columns 4..=6, rows 14..=16.
        assert!(tile_exists(&world, &cfg, 5, 5, 15));
        // Far away from the only populated column.
        assert!(!tile_exists(&world, &cfg, 5, 20, 15));
        // Column present but rows outside the range.
        assert!(!tile_exists(&world, &cfg, 5, 5, 40));
    }

    #[test]
    fn absent_columns_mean_no_maps_not_an_error() {
        let world = ranged_world();
        // Tile column 8 covers map columns 7..=9, none of which exist.
        assert!(!tile_exists(&world, &cfg(), 5, 8, 15));
    }

    #[test]
    fn range_edges_are_inclusive() {
        let world = ranged_world();
        let cfg = cfg();

        // Tile row 10 covers rows 9..=11; 10 is the y_min edge.
        assert!(tile_exists(&world, &cfg, 5, 5, 10));
        // Tile row 21 covers rows 20..=22; 20 is the y_max edge.
        assert!(tile_exists(&world, &cfg, 5, 5, 21));
        // Tile row 22 covers rows 21..=23, entirely past the range.
        assert!(!tile_exists(&world, &cfg, 5, 5, 22));
    }

    #[test]
    fn pyramid_bounds_answer_low_zooms() {
        let world = pyramid_world();
        let cfg = cfg();

        assert!(tile_exists(&world, &cfg, 3, -4, 0));
        assert!(tile_exists(&world, &cfg, 3, 7, 5));
        assert!(!tile_exists(&world, &cfg, 3, 8, 0));
        assert!(!tile_exists(&world, &cfg, 3, 0, 6));

        // One level down the extent floors towards negative infinity.
        assert!(tile_exists(&world, &cfg, 2, -2, 0));
        assert!(tile_exists(&world, &cfg, 2, 3, 2));
        assert!(!tile_exists(&world, &cfg, 2, 4, 0));
    }

    #[test]
    fn zooms_above_pyramid_fall_back_to_range_scan() {
        let mut world = pyramid_world();
        world.maps_ranges.insert(
            5,
            vec![meridian_shared::RowRange { y_min: 10, y_max: 20 }],
        );

        // zoom 5 > dimensions.max_zoom 3, so the pyramid no longer answers.
        assert!(tile_exists(&world, &cfg(), 5, 5, 15));
        assert!(!tile_exists(&world, &cfg(), 5, 20, 15));
    }
}
