use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use meridian_shared::{World, WorldConfig, WorldId};

use crate::existence;
use crate::surface::{RenderSurface, TileHandle};

/// Identity of one rendered tile. The world id is part of the key so a world
/// switch can never alias tiles across worlds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub world: WorldId,
    pub zoom: i32,
    pub x: i32,
    pub y: i32,
}

/// A fetched tile image together with its live display handle.
#[derive(Debug, Clone)]
pub struct CachedTile {
    pub data: Bytes,
    pub handle: TileHandle,
    pub fetched_at: DateTime<Utc>,
    last_used: u64,
}

/// Monotonic cache activity counters, readable via [`TileStore::snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounters {
    pub existence_hits: u64,
    pub existence_misses: u64,
    pub existence_scans: u64,
    pub image_hits: u64,
    pub fetch_failures: u64,
    pub evictions: u64,
    pub handles_created: u64,
    pub handles_released: u64,
}

/// Existence and image caches for the active world's tiles.
///
/// The store is the sole owner of display handles: one is created per cached
/// image and released exactly once, when its entry leaves the store.
pub struct TileStore<S: RenderSurface> {
    surface: S,
    existence: HashMap<TileKey, bool>,
    images: HashMap<TileKey, CachedTile>,
    max_images: usize,
    tick: u64,
    counters: StoreCounters,
}

impl<S: RenderSurface> TileStore<S> {
    pub fn new(surface: S, max_images: usize) -> Self {
        Self {
            surface,
            existence: HashMap::new(),
            images: HashMap::new(),
            max_images: max_images.max(1),
            tick: 0,
            counters: StoreCounters::default(),
        }
    }

    /// Cached existence verdict for `key`, if any.
    pub fn existence(&mut self, key: TileKey) -> Option<bool> {
        let known = self.existence.get(&key).copied();
        match known {
            Some(_) => self.counters.existence_hits += 1,
            None => self.counters.existence_misses += 1,
        }
        known
    }

    /// Record an existence verdict. Idempotent; a negative verdict never
    /// displaces a key whose image is already cached.
    pub fn set_existence(&mut self, key: TileKey, exists: bool) {
        if !exists && self.images.contains_key(&key) {
            return;
        }
        self.existence.insert(key, exists);
    }

    /// Cached verdict for `key`, computing and memoizing it on first probe.
    pub fn resolve_existence(&mut self, world: &World, cfg: &WorldConfig, key: TileKey) -> bool {
        if let Some(known) = self.existence(key) {
            return known;
        }
        let computed = existence::tile_exists(world, cfg, key.zoom, key.x, key.y);
        self.counters.existence_scans += 1;
        self.set_existence(key, computed);
        computed
    }

    /// Full cached entry for `key`, recency untouched.
    pub fn entry(&self, key: TileKey) -> Option<&CachedTile> {
        self.images.get(&key)
    }

    /// Display handle for a cached tile image, bumping its recency.
    pub fn image(&mut self, key: TileKey) -> Option<TileHandle> {
        self.tick += 1;
        let tick = self.tick;
        let tile = self.images.get_mut(&key)?;
        tile.last_used = tick;
        self.counters.image_hits += 1;
        Some(tile.handle)
    }

    /// Cache a fetched image, creating its display handle. Supersedes any
    /// previous entry for the key and evicts the least recently used entry
    /// once the store is full.
    pub fn insert_image(&mut self, key: TileKey, data: Bytes) -> TileHandle {
        if let Some(old) = self.images.remove(&key) {
            self.release(old.handle);
        } else if self.images.len() >= self.max_images {
            self.evict_lru();
        }

        let handle = self.surface.create_handle(key, &data);
        self.counters.handles_created += 1;
        self.tick += 1;
        self.images.insert(
            key,
            CachedTile {
                data,
                handle,
                fetched_at: Utc::now(),
                last_used: self.tick,
            },
        );
        handle
    }

    /// Record a failed fetch: counts it and caches the negative verdict
    /// (subject to the [`TileStore::set_existence`] image guard).
    pub fn note_fetch_failure(&mut self, key: TileKey) {
        self.counters.fetch_failures += 1;
        self.set_existence(key, false);
    }

    /// Drop everything and release every live handle. Runs on world switch.
    pub fn reset(&mut self) {
        let released = self.images.len();
        for (_, tile) in self.images.drain() {
            self.surface.release_handle(tile.handle);
            self.counters.handles_released += 1;
        }
        self.existence.clear();
        if released > 0 {
            debug!(released, "tile store reset");
        }
    }

    pub fn live_images(&self) -> usize {
        self.images.len()
    }

    pub fn snapshot(&self) -> StoreCounters {
        self.counters
    }

    fn evict_lru(&mut self) {
        let Some((&key, _)) = self.images.iter().min_by_key(|(_, tile)| tile.last_used) else {
            return;
        };
        let Some(tile) = self.images.remove(&key) else {
            return;
        };
        self.release(tile.handle);
        self.counters.evictions += 1;
        debug!(
            world = key.world,
            zoom = key.zoom,
            x = key.x,
            y = key.y,
            "evicted tile image"
        );
    }

    fn release(&mut self, handle: TileHandle) {
        self.surface.release_handle(handle);
        self.counters.handles_released += 1;
    }
}
