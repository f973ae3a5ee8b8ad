use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{info, warn};

use meridian_shared::coords;
use meridian_shared::{
    CellIndex, CellPoint, MISSING_TEXT, MarkerKind, Projected, Resource, ResourceId,
    ResourceMarker, StartPosition, TextCatalog, TextId, World, WorldConfig, WorldId, WorldMarker,
    WorldSummary,
};

use crate::backend::MapBackend;
use crate::cache::{StoreCounters, TileKey, TileStore};
use crate::config::{CLUSTER_RADIUS_PX, DEFAULT_START_X, DEFAULT_START_Y, SessionOptions};
use crate::icons;
use crate::loader::{self, TileLoad};
use crate::markers::{self, Cluster, ResourceCellMap};
use crate::selection::{self, HoverInfo, SelectedCell, SelectionTracker};
use crate::surface::RenderSurface;
use crate::viewport::{self, TileRect, Viewport};

/// A static world marker placed on the projected plane, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub kind: MarkerKind,
    pub anchor: Projected,
    pub icon: &'static str,
    pub title: String,
    pub destination: Option<(WorldId, StartPosition)>,
}

/// One entry of the active world's cell index, placed at `zoom`.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownCellRect {
    pub map_id: String,
    pub cell: CellPoint,
    pub anchor: Projected,
    pub width: f64,
    pub height: f64,
}

/// One map session: the active world plus every cache and view state derived
/// from it.
///
/// The session is single-threaded. Every async operation clones the world
/// handle before its first await so a concurrent world switch can never
/// invalidate what it is working on; the epoch counter catches the switches
/// that happen anyway while a fetch is in flight.
pub struct MapSession<B: MapBackend, S: RenderSurface> {
    backend: B,
    cfg: WorldConfig,
    worlds: Vec<WorldSummary>,
    active: RefCell<Rc<World>>,
    epoch: Cell<u64>,
    store: RefCell<TileStore<S>>,
    selection: RefCell<SelectionTracker>,
    resources: RefCell<Option<Rc<Vec<Resource>>>>,
    resource_markers: RefCell<HashMap<ResourceId, Rc<Vec<ResourceMarker>>>>,
    cell_index: RefCell<Option<Rc<CellIndex>>>,
    texts: RefCell<HashMap<String, Rc<TextCatalog>>>,
    language: RefCell<String>,
    max_concurrent_fetches: usize,
}

impl<B: MapBackend, S: RenderSurface> MapSession<B, S> {
    /// Bootstrap a session. Fetches the world catalog and the starting
    /// world, then the text catalog for `options.language`.
    pub async fn open(backend: B, surface: S, options: SessionOptions) -> Result<Self, String> {
        let catalog = backend.fetch_catalog().await?;
        let cfg = catalog.config.amplified(options.amplification);

        let world_id = options.world.unwrap_or(cfg.start_world_id);
        let mut world = backend.fetch_world(world_id).await?;
        clamp_start(&mut world, &cfg);

        let texts = Rc::new(backend.fetch_text_catalog(&options.language).await?);
        info!(world = world.id, language = %options.language, "session opened");

        Ok(Self {
            backend,
            cfg,
            worlds: catalog.worlds,
            active: RefCell::new(Rc::new(world)),
            epoch: Cell::new(0),
            store: RefCell::new(TileStore::new(surface, options.max_images)),
            selection: RefCell::new(SelectionTracker::default()),
            resources: RefCell::new(None),
            resource_markers: RefCell::new(HashMap::new()),
            cell_index: RefCell::new(None),
            texts: RefCell::new(HashMap::from([(options.language.clone(), texts)])),
            language: RefCell::new(options.language),
            max_concurrent_fetches: options.max_concurrent_fetches,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    pub fn worlds(&self) -> &[WorldSummary] {
        &self.worlds
    }

    /// Handle to the active world. Stays valid across a switch; it just no
    /// longer reflects the session.
    pub fn world(&self) -> Rc<World> {
        self.active.borrow().clone()
    }

    pub fn cache_stats(&self) -> StoreCounters {
        self.store.borrow().snapshot()
    }

    /// Camera placement for the active world, falling back to the map origin
    /// at full zoom for worlds without one.
    pub fn start_position(&self) -> StartPosition {
        self.active
            .borrow()
            .start_position
            .unwrap_or(StartPosition {
                x: DEFAULT_START_X,
                y: DEFAULT_START_Y,
                zoom: self.cfg.max_zoom,
            })
    }

    /// Activate another world and return where to place the camera.
    ///
    /// A failed fetch leaves the session on the current world. On success
    /// every per-world cache is dropped and in-flight tile fetches are
    /// retired via the epoch counter; the selection survives.
    pub async fn switch_world(
        &self,
        world_id: WorldId,
        override_start: Option<StartPosition>,
    ) -> Result<StartPosition, String> {
        let mut world = self.backend.fetch_world(world_id).await?;
        if let Some(start) = override_start {
            world.start_position = Some(start);
        }
        clamp_start(&mut world, &self.cfg);

        self.epoch.set(self.epoch.get() + 1);
        self.store.borrow_mut().reset();
        self.resource_markers.borrow_mut().clear();
        self.cell_index.borrow_mut().take();
        info!(world = world.id, "world activated");
        *self.active.borrow_mut() = Rc::new(world);

        Ok(self.start_position())
    }

    /// Load one tile of the active world.
    pub async fn load_tile(&self, zoom: i32, x: i32, y: i32) -> TileLoad {
        let world = self.world();
        let key = TileKey {
            world: world.id,
            zoom,
            x,
            y,
        };
        loader::load_tile(&self.backend, &self.store, &world, &self.cfg, &self.epoch, key).await
    }

    /// Tile grid rectangle covered by `view`.
    pub fn visible_tiles(&self, view: &Viewport) -> TileRect {
        viewport::tile_rect(view, &self.cfg)
    }

    /// Load every tile visible in `view`, with bounded fetch concurrency.
    pub async fn load_visible(&self, view: &Viewport) -> Vec<((i32, i32), TileLoad)> {
        let world = self.world();
        let rect = viewport::tile_rect(view, &self.cfg);
        loader::load_rect(
            &self.backend,
            &self.store,
            &world,
            &self.cfg,
            &self.epoch,
            view.zoom,
            rect,
            self.max_concurrent_fetches,
        )
        .await
    }

    /// The resource catalog, fetched once per session.
    pub async fn resources(&self) -> Result<Rc<Vec<Resource>>, String> {
        if let Some(cached) = self.resources.borrow().clone() {
            return Ok(cached);
        }
        let fetched = Rc::new(self.backend.fetch_resources().await?);
        *self.resources.borrow_mut() = Some(fetched.clone());
        Ok(fetched)
    }

    /// Aggregate the markers of `wanted` resources over the active world's
    /// cells. A resource whose markers cannot be fetched is skipped; a world
    /// switch during the pass voids the whole result.
    pub async fn resource_cells(&self, wanted: &[Resource]) -> ResourceCellMap {
        let started_at = self.epoch.get();
        let world_id = self.active.borrow().id;

        let mut cells = ResourceCellMap::new();
        for resource in wanted {
            let markers = match self.resource_markers_for(world_id, resource.id).await {
                Ok(markers) => markers,
                Err(e) => {
                    warn!(resource = resource.id, "resource markers unavailable: {e}");
                    continue;
                }
            };
            if self.epoch.get() != started_at {
                return ResourceCellMap::new();
            }
            markers::aggregate(&mut cells, resource, &markers, &self.cfg);
        }
        cells
    }

    /// Cluster aggregated resource cells for display at `zoom`.
    pub fn resource_clusters(&self, cells: &ResourceCellMap, zoom: i32) -> Vec<Cluster> {
        markers::cluster(cells, zoom, CLUSTER_RADIUS_PX)
    }

    /// Rectangles of every cell the active world's cell index knows about,
    /// ordered by external map id. Empty when the index is unavailable.
    pub async fn known_cell_rects(&self, zoom: i32) -> Vec<KnownCellRect> {
        let Some(index) = self.cell_index_for_active().await else {
            return Vec::new();
        };

        let (width, height) = coords::scaled_map_dims(zoom, &self.cfg);
        let mut rects: Vec<KnownCellRect> = index
            .iter()
            .map(|(map_id, &cell)| KnownCellRect {
                map_id: map_id.clone(),
                cell,
                anchor: coords::game_to_projected(cell.x as f64, cell.y as f64, &self.cfg),
                width,
                height,
            })
            .collect();
        rects.sort_by(|a, b| a.map_id.cmp(&b.map_id));
        rects
    }

    /// Static markers of the active world with icon, resolved title and jump
    /// target, in deterministic draw order.
    pub fn static_markers(&self) -> Vec<PlacedMarker> {
        let world = self.world();
        let mut placed: Vec<PlacedMarker> = world
            .markers
            .iter()
            .flat_map(|(&kind, group)| {
                group.iter().map(move |marker| PlacedMarker {
                    kind,
                    anchor: coords::game_to_projected(marker.x, marker.y, &self.cfg),
                    icon: icons::marker_icon(kind),
                    title: self.marker_title(marker),
                    destination: marker.destination(),
                })
            })
            .collect();

        placed.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then(a.anchor.x.total_cmp(&b.anchor.x))
                .then(a.anchor.y.total_cmp(&b.anchor.y))
        });
        placed
    }

    /// Switch the display language, fetching its text catalog on first use.
    /// On failure the current language stays active.
    pub async fn set_language(&self, language: &str) -> Result<(), String> {
        if !self.texts.borrow().contains_key(language) {
            let catalog = Rc::new(self.backend.fetch_text_catalog(language).await?);
            self.texts
                .borrow_mut()
                .insert(language.to_string(), catalog);
        }
        *self.language.borrow_mut() = language.to_string();
        Ok(())
    }

    pub fn language(&self) -> String {
        self.language.borrow().clone()
    }

    /// Resolve a text id through the active language's catalog.
    pub fn text(&self, id: TextId, args: &[TextId]) -> String {
        let language = self.language.borrow();
        match self.texts.borrow().get(language.as_str()) {
            Some(catalog) => catalog.resolve(id, args),
            None => MISSING_TEXT.to_string(),
        }
    }

    pub fn world_name(&self) -> String {
        let name_id = self.active.borrow().name_id;
        self.text(name_id, &[])
    }

    pub fn marker_title(&self, marker: &WorldMarker) -> String {
        match marker.title_id {
            Some(id) => self.text(id, &marker.title_params),
            None => MISSING_TEXT.to_string(),
        }
    }

    pub fn set_selection_armed(&self, armed: bool) {
        self.selection.borrow_mut().set_armed(armed);
    }

    pub fn selection_armed(&self) -> bool {
        self.selection.borrow().armed()
    }

    /// Toggle the cell under `position`; `Some` when it is now selected.
    pub fn toggle_cell_at(&self, position: Projected, zoom: i32) -> Option<CellPoint> {
        let info = selection::hover_at(position, zoom, &self.cfg);
        self.selection
            .borrow_mut()
            .toggle(info.cell, zoom, &self.cfg)
            .then_some(info.cell)
    }

    pub fn hover(&self, position: Projected, zoom: i32) -> HoverInfo {
        selection::hover_at(position, zoom, &self.cfg)
    }

    /// Selected cells in grid order.
    pub fn selected_cells(&self) -> Vec<SelectedCell> {
        let mut cells: Vec<SelectedCell> = self.selection.borrow().iter().copied().collect();
        cells.sort_by_key(|placed| (placed.cell.x, placed.cell.y));
        cells
    }

    pub fn resize_selection(&self, zoom: i32) {
        self.selection.borrow_mut().resize(zoom, &self.cfg);
    }

    pub fn clear_selection(&self) {
        self.selection.borrow_mut().clear();
    }

    async fn resource_markers_for(
        &self,
        world_id: WorldId,
        resource: ResourceId,
    ) -> Result<Rc<Vec<ResourceMarker>>, String> {
        if let Some(cached) = self.resource_markers.borrow().get(&resource).cloned() {
            return Ok(cached);
        }

        let started_at = self.epoch.get();
        let markers = Rc::new(
            self.backend
                .fetch_resource_markers(world_id, resource)
                .await?,
        );
        // Markers are per world: a fetch that straddled a switch must not
        // poison the new world's memo.
        if self.epoch.get() == started_at {
            self.resource_markers
                .borrow_mut()
                .insert(resource, markers.clone());
        }
        Ok(markers)
    }

    async fn cell_index_for_active(&self) -> Option<Rc<CellIndex>> {
        if let Some(cached) = self.cell_index.borrow().clone() {
            return Some(cached);
        }

        let started_at = self.epoch.get();
        let world_id = self.active.borrow().id;
        match self.backend.fetch_cell_index(world_id).await {
            Ok(index) => {
                if self.epoch.get() != started_at {
                    return None;
                }
                let index = Rc::new(index);
                *self.cell_index.borrow_mut() = Some(index.clone());
                Some(index)
            }
            Err(e) => {
                warn!(world = world_id, "cell index unavailable: {e}");
                None
            }
        }
    }
}

/// Keep a world's start zoom inside the displayable band.
fn clamp_start(world: &mut World, cfg: &WorldConfig) {
    if let Some(start) = world.start_position.as_mut() {
        start.zoom = start.zoom.min(cfg.max_zoom).max(world.min_zoom);
    }
}
