use meridian_shared::WorldId;

/// Base pixel growth of resource icons per unit of scaling factor.
pub const RESOURCE_ICON_BASE: f64 = 150.0;
/// Floor added to every resource icon size.
pub const RESOURCE_ICON_MIN: f64 = 16.0;
/// Resource icons never grow past this edge length.
pub const RESOURCE_ICON_MAX: u32 = 60;
/// Floor added to the resource quantity text size.
pub const RESOURCE_TEXT_MIN: f64 = 8.0;
/// Quantity text is hidden while icons are smaller than this.
pub const RESOURCE_TEXT_VISIBLE_MIN: u32 = 32;
/// Base pixel growth of static world markers.
pub const STATIC_MARKER_BASE: f64 = 79.0;
/// Floor added to every static marker size.
pub const STATIC_MARKER_MIN: u32 = 14;
/// Resource cells whose pixel anchors fall within one bucket of this edge
/// length collapse into a single cluster.
pub const CLUSTER_RADIUS_PX: f64 = 40.0;
/// Selected-cell coordinate labels appear at this zoom and above.
pub const SELECTION_LABEL_MIN_ZOOM: i32 = 3;
pub const DEFAULT_MAX_TILE_IMAGES: usize = 512;
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 6;
/// Camera fallback for worlds without a start position of their own.
pub const DEFAULT_START_X: f64 = 0.5;
pub const DEFAULT_START_Y: f64 = 0.5;
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Per-session tuning, supplied once when the session is opened.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// One-time multiplier applied to every pixel dimension of the config.
    pub amplification: f64,
    /// World to activate instead of the catalog's start world.
    pub world: Option<WorldId>,
    pub language: String,
    pub max_images: usize,
    pub max_concurrent_fetches: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            amplification: 1.0,
            world: None,
            language: DEFAULT_LANGUAGE.to_string(),
            max_images: DEFAULT_MAX_TILE_IMAGES,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}
