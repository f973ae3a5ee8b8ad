use std::cell::{Cell, RefCell};

use futures::StreamExt;
use tracing::{debug, warn};

use meridian_shared::{World, WorldConfig};

use crate::backend::MapBackend;
use crate::cache::{TileKey, TileStore};
use crate::surface::{RenderSurface, TileHandle};
use crate::viewport::TileRect;

/// Outcome of a single tile load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLoad {
    /// The tile image is cached and displayable.
    Ready(TileHandle),
    /// No tile exists at this key, or fetching it failed.
    Missing,
    /// The world changed while the fetch was in flight; nothing was cached.
    Stale,
}

/// Load one tile through the existence and image caches.
///
/// A fetch that completes after the session epoch moved on is discarded
/// without touching the store.
pub async fn load_tile<B: MapBackend, S: RenderSurface>(
    backend: &B,
    store: &RefCell<TileStore<S>>,
    world: &World,
    cfg: &WorldConfig,
    epoch: &Cell<u64>,
    key: TileKey,
) -> TileLoad {
    let started_at = epoch.get();

    {
        let mut store = store.borrow_mut();
        if !store.resolve_existence(world, cfg, key) {
            return TileLoad::Missing;
        }
        if let Some(handle) = store.image(key) {
            return TileLoad::Ready(handle);
        }
    }

    let fetched = backend.fetch_tile(key).await;

    if epoch.get() != started_at {
        debug!(
            world = key.world,
            zoom = key.zoom,
            x = key.x,
            y = key.y,
            "discarding stale tile fetch"
        );
        return TileLoad::Stale;
    }

    let mut store = store.borrow_mut();
    match fetched {
        Ok(data) if !data.is_empty() => {
            store.set_existence(key, true);
            TileLoad::Ready(store.insert_image(key, data))
        }
        Ok(_) => {
            warn!(
                world = key.world,
                zoom = key.zoom,
                x = key.x,
                y = key.y,
                "tile fetch returned an empty payload"
            );
            store.note_fetch_failure(key);
            TileLoad::Missing
        }
        Err(e) => {
            warn!(
                world = key.world,
                zoom = key.zoom,
                x = key.x,
                y = key.y,
                "tile fetch failed: {e}"
            );
            store.note_fetch_failure(key);
            TileLoad::Missing
        }
    }
}

/// Load every tile of `rect` with bounded concurrency. Results carry the
/// tile grid position and arrive in completion order.
pub async fn load_rect<B: MapBackend, S: RenderSurface>(
    backend: &B,
    store: &RefCell<TileStore<S>>,
    world: &World,
    cfg: &WorldConfig,
    epoch: &Cell<u64>,
    zoom: i32,
    rect: TileRect,
    max_concurrent: usize,
) -> Vec<((i32, i32), TileLoad)> {
    futures::stream::iter(rect.iter())
        .map(|(x, y)| {
            let key = TileKey {
                world: world.id,
                zoom,
                x,
                y,
            };
            async move { ((x, y), load_tile(backend, store, world, cfg, epoch, key).await) }
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await
}
