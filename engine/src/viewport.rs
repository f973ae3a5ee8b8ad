use meridian_shared::{Projected, WorldConfig};

/// A visible window over the projected plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Projected,
    pub zoom: i32,
    pub width_px: f64,
    pub height_px: f64,
}

/// Inclusive rectangle of tile grid positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl TileRect {
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.max_x - self.min_x + 1) as usize * (self.max_y - self.min_y + 1) as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Grid positions row by row, left to right.
    pub fn iter(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| (x, y)))
    }
}

/// Tiles overlapped by `view`. Projected coordinates scale by `2^zoom` to
/// screen pixels, so the same window slides across the grid as zoom changes.
pub fn tile_rect(view: &Viewport, cfg: &WorldConfig) -> TileRect {
    let scale = 2f64.powi(view.zoom);
    let center_x = view.center.x * scale;
    let center_y = view.center.y * scale;
    let half_w = view.width_px / 2.0;
    let half_h = view.height_px / 2.0;

    TileRect {
        min_x: ((center_x - half_w) / cfg.tile_size).floor() as i32,
        max_x: ((center_x + half_w) / cfg.tile_size).floor() as i32,
        min_y: ((center_y - half_h) / cfg.tile_size).floor() as i32,
        max_y: ((center_y + half_h) / cfg.tile_size).floor() as i32,
    }
}
