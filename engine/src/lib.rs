pub mod backend;
pub mod cache;
pub mod config;
pub mod existence;
pub mod icons;
pub mod loader;
pub mod markers;
pub mod selection;
pub mod session;
pub mod surface;
pub mod viewport;

pub use backend::MapBackend;
pub use cache::{StoreCounters, TileKey, TileStore};
pub use config::SessionOptions;
pub use loader::TileLoad;
pub use session::MapSession;
pub use surface::{RenderSurface, TileHandle};
pub use viewport::{TileRect, Viewport};
