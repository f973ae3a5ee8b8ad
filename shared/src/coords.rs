//! Pure coordinate mathematics for the tiled world projection.
//!
//! Game space addresses cells by integer coordinates with y growing upward.
//! Projected space is the zoom-independent plane the renderer consumes (a
//! simple CRS: pixel position at zoom z is the projected point times 2^z);
//! its y axis grows downward, so projection inverts the vertical axis.

use crate::world::WorldConfig;

/// A point on the zoom-independent projected plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
}

/// Scale multiplier of `zoom` relative to `max_zoom`: 1 at max, halving per
/// level below, doubling per level above.
pub fn scaling_factor(zoom: i32, max_zoom: i32) -> f64 {
    2f64.powi(zoom - max_zoom)
}

/// Project game coordinates onto the map plane.
pub fn game_to_projected(gx: f64, gy: f64, cfg: &WorldConfig) -> Projected {
    let sf = scaling_factor(0, cfg.max_zoom);
    Projected {
        x: gx * cfg.map_img_width * sf,
        y: -gy * cfg.map_img_height * sf,
    }
}

/// Game coordinates to a concrete pixel position at `zoom`.
pub fn game_to_pixel(gx: f64, gy: f64, zoom: i32, cfg: &WorldConfig) -> (f64, f64) {
    let sf = scaling_factor(zoom, cfg.max_zoom);
    (gx * cfg.map_img_width * sf, -gy * cfg.map_img_height * sf)
}

/// Fractional game coordinates under a projected point.
pub fn projected_to_game(p: Projected, cfg: &WorldConfig) -> (f64, f64) {
    let sf = scaling_factor(0, cfg.max_zoom);
    (
        p.x / (cfg.map_img_width * sf),
        -p.y / (cfg.map_img_height * sf),
    )
}

/// The game cell containing a projected point.
pub fn cell_at(p: Projected, cfg: &WorldConfig) -> (i32, i32) {
    let (x, y) = projected_to_game(p, cfg);
    (x.floor() as i32, y.floor() as i32)
}

/// On-screen size of one game map at `zoom`: (width, height) in px.
pub fn scaled_map_dims(zoom: i32, cfg: &WorldConfig) -> (f64, f64) {
    let sf = scaling_factor(zoom, cfg.max_zoom);
    (cfg.map_img_width * sf, cfg.map_img_height * sf)
}

/// Pixel offset of a tile index along its axis.
pub fn tile_offset(tile_coord: i32, cfg: &WorldConfig) -> f64 {
    tile_coord as f64 * cfg.tile_size
}

/// Inclusive range of game-map columns overlapped by tile column `tile_x`.
pub fn tile_column_range(tile_x: i32, zoom: i32, cfg: &WorldConfig) -> (i32, i32) {
    let sf = scaling_factor(zoom, cfg.max_zoom);
    axis_range(
        tile_offset(tile_x, cfg),
        cfg.map_overlay_side * sf,
        cfg.map_img_width * sf,
        cfg,
    )
}

/// Inclusive range of game-map rows overlapped by tile row `tile_y`.
pub fn tile_row_range(tile_y: i32, zoom: i32, cfg: &WorldConfig) -> (i32, i32) {
    let sf = scaling_factor(zoom, cfg.max_zoom);
    axis_range(
        tile_offset(tile_y, cfg),
        cfg.map_overlay_bottom * sf,
        cfg.map_img_height * sf,
        cfg,
    )
}

// The low bound reaches one full unit further back than the high bound; the
// served tile grids assume exactly this footprint, so both formulas must stay
// as they are.
fn axis_range(offset: f64, overlay: f64, unit: f64, cfg: &WorldConfig) -> (i32, i32) {
    let min = ((offset - overlay - unit) / unit).ceil() as i32;
    let max = ((offset + cfg.tile_size + overlay) / unit).floor() as i32;
    (min, max)
}
