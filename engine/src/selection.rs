use std::collections::HashMap;
use std::collections::hash_map::Values;

use meridian_shared::coords;
use meridian_shared::{CellPoint, Projected, WorldConfig};

use crate::config::SELECTION_LABEL_MIN_ZOOM;

/// A selected cell with the projected footprint it is drawn at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedCell {
    pub cell: CellPoint,
    pub anchor: Projected,
    pub width: f64,
    pub height: f64,
}

/// Cell under the pointer, snapped to the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverInfo {
    pub cell: CellPoint,
    pub anchor: Projected,
    pub width: f64,
    pub height: f64,
}

impl HoverInfo {
    /// Coordinate label shown next to the hover highlight.
    pub fn coords_label(&self) -> String {
        format!("({}, {})", self.cell.x, self.cell.y)
    }
}

/// Toggled cell selection. Selection is inert until armed; disarming wipes it.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    selected: HashMap<String, SelectedCell>,
    armed: bool,
}

impl SelectionTracker {
    pub fn set_armed(&mut self, armed: bool) {
        if !armed {
            self.selected.clear();
        }
        self.armed = armed;
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    /// Flip a cell's membership, returning whether it is now selected.
    /// Does nothing while disarmed.
    pub fn toggle(&mut self, cell: CellPoint, zoom: i32, cfg: &WorldConfig) -> bool {
        if !self.armed {
            return false;
        }
        let key = cell_key(cell);
        if self.selected.remove(&key).is_some() {
            return false;
        }
        self.selected.insert(key, placed_cell(cell, zoom, cfg));
        true
    }

    pub fn contains(&self, cell: CellPoint) -> bool {
        self.selected.contains_key(&cell_key(cell))
    }

    pub fn remove(&mut self, cell: CellPoint) {
        self.selected.remove(&cell_key(cell));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Recompute every footprint for a new zoom. Membership is untouched.
    pub fn resize(&mut self, zoom: i32, cfg: &WorldConfig) {
        for entry in self.selected.values_mut() {
            *entry = placed_cell(entry.cell, zoom, cfg);
        }
    }

    pub fn iter(&self) -> Values<'_, String, SelectedCell> {
        self.selected.values()
    }
}

fn placed_cell(cell: CellPoint, zoom: i32, cfg: &WorldConfig) -> SelectedCell {
    let (width, height) = coords::scaled_map_dims(zoom, cfg);
    SelectedCell {
        cell,
        anchor: coords::game_to_projected(cell.x as f64, cell.y as f64, cfg),
        width,
        height,
    }
}

/// Storage key for a cell, `"x*y"`.
pub fn cell_key(cell: CellPoint) -> String {
    format!("{}*{}", cell.x, cell.y)
}

/// Inverse of [`cell_key`]. Panics on a malformed key: these strings only
/// ever come from [`cell_key`] itself or from the cell index payload, so a
/// parse failure is corrupt data, not user input.
pub fn parse_cell_key(key: &str) -> CellPoint {
    let Some((x, y)) = key.split_once('*') else {
        panic!("malformed cell key {key:?}: expected \"x*y\"");
    };
    let (Ok(x), Ok(y)) = (x.parse(), y.parse()) else {
        panic!("malformed cell key {key:?}: expected \"x*y\"");
    };
    CellPoint { x, y }
}

/// Whether selection coordinate labels are drawn at `zoom`.
pub fn labels_visible(zoom: i32) -> bool {
    zoom >= SELECTION_LABEL_MIN_ZOOM
}

/// Snap a projected position to the cell grid under it.
pub fn hover_at(position: Projected, zoom: i32, cfg: &WorldConfig) -> HoverInfo {
    let (x, y) = coords::cell_at(position, cfg);
    let cell = CellPoint { x, y };
    let (width, height) = coords::scaled_map_dims(zoom, cfg);
    HoverInfo {
        cell,
        anchor: coords::game_to_projected(cell.x as f64, cell.y as f64, cfg),
        width,
        height,
    }
}
