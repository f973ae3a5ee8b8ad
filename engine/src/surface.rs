use bytes::Bytes;

use crate::cache::TileKey;

/// Opaque display resource issued by a [`RenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileHandle(pub u64);

/// Factory for displayable tile resources (object URLs in a browser shell,
/// texture ids on a GPU surface).
///
/// The tile store is the only caller. It releases every handle it creates,
/// exactly once, in no particular order.
pub trait RenderSurface {
    fn create_handle(&mut self, key: TileKey, data: &Bytes) -> TileHandle;
    fn release_handle(&mut self, handle: TileHandle);
}
