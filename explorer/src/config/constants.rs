// Agent origin (Hampi, Karnataka)
pub const DEFAULT_ORIGIN_LAT: f64 = 15.3350;
pub const DEFAULT_ORIGIN_LNG: f64 = 76.4600;

// Camera and projection
pub const DEFAULT_ZOOM: f64 = 13.0;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 22.0;
pub const TILE_SIZE: f64 = 256.0;                 // Raster tile edge in pixels
pub const MAX_LATITUDE: f64 = 85.051_128_78;      // Web Mercator cut-off
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 800;

// Tile backend
pub const DEFAULT_TILE_URL: &str = "https://a.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

// Fog overlay
pub const FOG_COLOR: [u8; 3] = [26, 26, 26];
pub const FOG_ALPHA: f32 = 0.95;
pub const REVEAL_RADIUS_PX: f64 = 80.0;          // Outer radius of the soft reveal
pub const MAP_BACKGROUND: [u8; 3] = [229, 231, 235];

// Markers
pub const QUEST_MARKER_COLOR: [u8; 3] = [220, 38, 38];
pub const AGENT_MARKER_COLOR: [u8; 3] = [37, 99, 235];
pub const MARKER_RADIUS_PX: f64 = 7.0;

// Geofence: axis-aligned box in degrees, roughly 500 m at the equator
pub const GEOFENCE_THRESHOLD_DEG: f64 = 0.005;

// Simulated movement
pub const WALK_JITTER_DEG: f64 = 0.005;
pub const MAX_WALK_JITTER_DEG: f64 = 90.0;
pub const TICK_INTERVAL_MS: u64 = 1000;
