use serde::{Deserialize, Serialize};

use crate::world::{StartPosition, TextId, WorldId};

pub type ResourceId = u32;

/// Static marker categories as they appear on the wire.
///
/// The set is closed: anything unrecognized deserializes as `Unknown` and is
/// rendered with the default icon rather than rejecting the whole world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "type1")]
    GoDown,
    #[serde(rename = "type2")]
    GoUp,
    #[serde(rename = "type3")]
    Secret,
    #[serde(rename = "type4")]
    Teleport,
    #[serde(rename = "type5")]
    Temple,
    #[serde(other)]
    Unknown,
}

/// A fixed marker pinned to a world position, such as a staircase or a zaap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMarker {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub title_id: Option<TextId>,
    #[serde(default)]
    pub title_params: Vec<TextId>,
    #[serde(default)]
    pub world_id: Option<WorldId>,
    #[serde(default)]
    pub to_x: f64,
    #[serde(default)]
    pub to_y: f64,
    #[serde(default)]
    pub zoom: Option<i32>,
}

impl WorldMarker {
    /// Jump target for travel markers. `None` for purely informational ones.
    pub fn destination(&self) -> Option<(WorldId, StartPosition)> {
        let world = self.world_id?;
        let zoom = self.zoom?;
        Some((
            world,
            StartPosition {
                x: self.to_x,
                y: self.to_y,
                zoom,
            },
        ))
    }
}

/// One harvest report for a resource inside a single game cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMarker {
    pub x: i32,
    pub y: i32,
    pub quantity: u32,
}

/// A harvestable resource as listed in the resource catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
}
