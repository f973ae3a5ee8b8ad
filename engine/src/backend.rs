use std::future::Future;

use bytes::Bytes;

use meridian_shared::{
    CellIndex, Resource, ResourceId, ResourceMarker, TextCatalog, World, WorldCatalog, WorldId,
};

use crate::cache::TileKey;

/// Remote data source for everything a map session displays.
///
/// Implementations are HTTP adapters in production and in-memory fixtures in
/// tests. Futures need not be `Send`; the engine runs on one thread.
pub trait MapBackend {
    /// The selectable worlds plus their shared rendering config.
    fn fetch_catalog(&self) -> impl Future<Output = Result<WorldCatalog, String>>;

    /// Full metadata for one world.
    fn fetch_world(&self, world: WorldId) -> impl Future<Output = Result<World, String>>;

    /// Raw image bytes for one tile.
    fn fetch_tile(&self, key: TileKey) -> impl Future<Output = Result<Bytes, String>>;

    /// The harvestable resource catalog.
    fn fetch_resources(&self) -> impl Future<Output = Result<Vec<Resource>, String>>;

    /// Every reported marker for one resource in one world.
    fn fetch_resource_markers(
        &self,
        world: WorldId,
        resource: ResourceId,
    ) -> impl Future<Output = Result<Vec<ResourceMarker>, String>>;

    /// Known map-id -> cell assignments for one world.
    fn fetch_cell_index(&self, world: WorldId) -> impl Future<Output = Result<CellIndex, String>>;

    /// Id -> template text mapping for one language.
    fn fetch_text_catalog(
        &self,
        language: &str,
    ) -> impl Future<Output = Result<TextCatalog, String>>;
}
