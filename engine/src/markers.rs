use std::collections::HashMap;

use meridian_shared::coords;
use meridian_shared::{CellPoint, Projected, Resource, ResourceId, ResourceMarker, WorldConfig};

use crate::config::{
    RESOURCE_ICON_BASE, RESOURCE_ICON_MAX, RESOURCE_ICON_MIN, RESOURCE_TEXT_MIN,
    RESOURCE_TEXT_VISIBLE_MIN, STATIC_MARKER_BASE, STATIC_MARKER_MIN,
};

/// Per-cell aggregation of every resource sitting on that cell.
pub type ResourceCellMap = HashMap<CellPoint, ResourceCell>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceCell {
    /// Projected position of the cell center.
    pub anchor: Projected,
    pub resources: HashMap<ResourceId, AggregatedResource>,
}

impl ResourceCell {
    /// Summed quantity across every resource on the cell.
    pub fn quantity(&self) -> u32 {
        self.resources.values().map(|r| r.quantity).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResource {
    pub name: String,
    pub quantity: u32,
}

/// Fold one resource's markers into the cell map. Markers of the same
/// resource landing on the same cell add their quantities; the fold order
/// never changes the result.
pub fn aggregate(
    cells: &mut ResourceCellMap,
    resource: &Resource,
    markers: &[ResourceMarker],
    cfg: &WorldConfig,
) {
    for marker in markers {
        let point = CellPoint {
            x: marker.x,
            y: marker.y,
        };
        let cell = cells.entry(point).or_insert_with(|| ResourceCell {
            anchor: coords::game_to_projected(point.x as f64 + 0.5, point.y as f64 + 0.5, cfg),
            resources: HashMap::new(),
        });
        cell.resources
            .entry(resource.id)
            .and_modify(|aggregated| aggregated.quantity += marker.quantity)
            .or_insert_with(|| AggregatedResource {
                name: resource.name.clone(),
                quantity: marker.quantity,
            });
    }
}

/// A group of cells drawn as one marker at the current zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Centroid of the member anchors.
    pub anchor: Projected,
    /// Member cells, ordered by grid position.
    pub members: Vec<CellPoint>,
    pub total_quantity: u32,
}

impl Cluster {
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Group cells whose screen positions fall within `radius_px` of each other
/// at `zoom`. Output order is deterministic regardless of map iteration.
pub fn cluster(cells: &ResourceCellMap, zoom: i32, radius_px: f64) -> Vec<Cluster> {
    let scale = 2f64.powi(zoom);
    let mut buckets: HashMap<(i64, i64), Vec<(&CellPoint, &ResourceCell)>> = HashMap::new();
    for (point, cell) in cells {
        let bucket_x = (cell.anchor.x * scale / radius_px).floor() as i64;
        let bucket_y = (cell.anchor.y * scale / radius_px).floor() as i64;
        buckets
            .entry((bucket_x, bucket_y))
            .or_default()
            .push((point, cell));
    }

    let mut clusters: Vec<Cluster> = buckets
        .into_values()
        .map(|mut members| {
            members.sort_by_key(|(point, _)| (point.x, point.y));
            let count = members.len() as f64;
            let anchor = Projected {
                x: members.iter().map(|(_, cell)| cell.anchor.x).sum::<f64>() / count,
                y: members.iter().map(|(_, cell)| cell.anchor.y).sum::<f64>() / count,
            };
            Cluster {
                anchor,
                total_quantity: members.iter().map(|(_, cell)| cell.quantity()).sum(),
                members: members.into_iter().map(|(point, _)| *point).collect(),
            }
        })
        .collect();

    clusters.sort_by(|a, b| {
        a.anchor
            .x
            .total_cmp(&b.anchor.x)
            .then(a.anchor.y.total_cmp(&b.anchor.y))
    });
    clusters
}

/// Pixel size of a resource marker icon at `zoom`, capped at the full-detail
/// size.
pub fn resource_icon_size(zoom: i32, cfg: &WorldConfig) -> u32 {
    let sf = coords::scaling_factor(zoom, cfg.max_zoom);
    let size = (RESOURCE_ICON_BASE * sf + RESOURCE_ICON_MIN).trunc() as u32;
    size.min(RESOURCE_ICON_MAX)
}

/// Font size of the quantity label on a resource marker.
pub fn resource_text_size(zoom: i32, cfg: &WorldConfig) -> u32 {
    let sf = coords::scaling_factor(zoom, cfg.max_zoom);
    (RESOURCE_ICON_BASE * sf + RESOURCE_TEXT_MIN).trunc() as u32
}

/// Quantity labels disappear once the icon shrinks below readable size.
pub fn resource_text_visible(zoom: i32, cfg: &WorldConfig) -> bool {
    resource_icon_size(zoom, cfg) >= RESOURCE_TEXT_VISIBLE_MIN
}

/// Pixel size of a world marker icon at `zoom`.
pub fn static_marker_size(zoom: i32, cfg: &WorldConfig) -> u32 {
    let sf = coords::scaling_factor(zoom, cfg.max_zoom);
    (STATIC_MARKER_BASE * sf).trunc() as u32 + STATIC_MARKER_MIN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorldConfig {
        WorldConfig {
            tile_size: 256.0,
            map_img_width: 64.0,
            map_img_height: 64.0,
            map_overlay_side: 0.0,
            map_overlay_bottom: 0.0,
            max_zoom: 5,
            start_world_id: 1,
        }
    }

    fn resource(id: ResourceId, name: &str) -> Resource {
        Resource {
            id,
            name: name.to_string(),
        }
    }

    fn marker(x: i32, y: i32, quantity: u32) -> ResourceMarker {
        ResourceMarker { x, y, quantity }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn same_resource_quantities_merge_per_cell() {
        let cfg = config();
        let wheat = resource(9, "Wheat");
        let first = [marker(5, 8, 3)];
        let second = [marker(5, 8, 4)];

        let mut forward = ResourceCellMap::new();
        aggregate(&mut forward, &wheat, &first, &cfg);
        aggregate(&mut forward, &wheat, &second, &cfg);

        let mut reverse = ResourceCellMap::new();
        aggregate(&mut reverse, &wheat, &second, &cfg);
        aggregate(&mut reverse, &wheat, &first, &cfg);

        assert_eq!(forward, reverse);
        let cell = &forward[&CellPoint { x: 5, y: 8 }];
        assert_eq!(cell.resources.len(), 1);
        assert_eq!(cell.resources[&9].quantity, 7);
        assert_eq!(cell.quantity(), 7);
    }

    #[test]
    fn distinct_resources_share_a_cell() {
        let cfg = config();
        let mut cells = ResourceCellMap::new();
        aggregate(&mut cells, &resource(9, "Wheat"), &[marker(5, 8, 3)], &cfg);
        aggregate(&mut cells, &resource(12, "Flax"), &[marker(5, 8, 2)], &cfg);

        let cell = &cells[&CellPoint { x: 5, y: 8 }];
        assert_eq!(cell.resources.len(), 2);
        assert_eq!(cell.resources[&9].name, "Wheat");
        assert_eq!(cell.resources[&12].name, "Flax");
        assert_eq!(cell.quantity(), 5);
    }

    #[test]
    fn anchors_sit_at_cell_centers() {
        let cfg = config();
        let mut cells = ResourceCellMap::new();
        aggregate(&mut cells, &resource(9, "Wheat"), &[marker(2, 3, 1)], &cfg);

        let anchor = cells[&CellPoint { x: 2, y: 3 }].anchor;
        assert_close(anchor.x, 2.5 * 64.0 / 32.0);
        assert_close(anchor.y, -3.5 * 64.0 / 32.0);
    }

    #[test]
    fn icon_sizes_follow_the_zoom_ladder() {
        let cfg = config();

        assert_eq!(resource_icon_size(5, &cfg), 60);
        assert_eq!(resource_icon_size(3, &cfg), 53);
        assert_eq!(resource_icon_size(2, &cfg), 34);
        assert_eq!(resource_icon_size(1, &cfg), 25);

        assert!(resource_text_visible(3, &cfg));
        assert!(resource_text_visible(2, &cfg));
        assert!(!resource_text_visible(1, &cfg));

        assert_eq!(resource_text_size(5, &cfg), 158);
        assert_eq!(resource_text_size(3, &cfg), 45);

        assert_eq!(static_marker_size(5, &cfg), 93);
        assert_eq!(static_marker_size(4, &cfg), 53);
    }

    #[test]
    fn nearby_cells_merge_at_low_zoom_and_split_at_high() {
        let cfg = config();
        let mut cells = ResourceCellMap::new();
        aggregate(&mut cells, &resource(9, "Wheat"), &[marker(0, 0, 3)], &cfg);
        aggregate(&mut cells, &resource(9, "Wheat"), &[marker(1, 0, 4)], &cfg);

        let merged = cluster(&cells, 3, 40.0);
        assert_eq!(merged.len(), 1);
        assert!(!merged[0].is_single());
        assert_eq!(merged[0].total_quantity, 7);
        assert_eq!(
            merged[0].members,
            vec![CellPoint { x: 0, y: 0 }, CellPoint { x: 1, y: 0 }]
        );
        assert_close(merged[0].anchor.x, 2.0);
        assert_close(merged[0].anchor.y, -1.0);

        let split = cluster(&cells, 5, 40.0);
        assert_eq!(split.len(), 2);
        assert!(split.iter().all(Cluster::is_single));
    }

    #[test]
    fn cluster_output_is_deterministic() {
        let cfg = config();
        let wheat = resource(9, "Wheat");

        let mut forward = ResourceCellMap::new();
        for x in 0..6 {
            aggregate(&mut forward, &wheat, &[marker(x, 0, 1)], &cfg);
        }
        let mut reverse = ResourceCellMap::new();
        for x in (0..6).rev() {
            aggregate(&mut reverse, &wheat, &[marker(x, 0, 1)], &cfg);
        }

        assert_eq!(cluster(&forward, 4, 40.0), cluster(&reverse, 4, 40.0));
    }
}
