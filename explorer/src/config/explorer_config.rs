use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::constants::*;
use crate::data::poi::Coordinate;
use crate::geo::projection::Camera;
use crate::geo::tiles::TileSource;
use crate::render::fog::RevealMode;
use crate::utils::logging::{self, FileIOType, OperationCategory};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub color: [u8; 3],
    pub alpha: f32,
    pub reveal_radius_px: f64,
    pub mode: RevealMode,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: FOG_COLOR,
            alpha: FOG_ALPHA,
            reveal_radius_px: REVEAL_RADIUS_PX,
            mode: RevealMode::Replay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub origin: Coordinate,
    pub viewport: ViewportConfig,
    pub fog: FogConfig,
    pub tick_interval_ms: u64,
    pub geofence_threshold_deg: f64,
    pub walk_jitter_deg: f64,
    pub tile_url_template: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            origin: Coordinate::new(DEFAULT_ORIGIN_LAT, DEFAULT_ORIGIN_LNG),
            viewport: ViewportConfig::default(),
            fog: FogConfig::default(),
            tick_interval_ms: TICK_INTERVAL_MS,
            geofence_threshold_deg: GEOFENCE_THRESHOLD_DEG,
            walk_jitter_deg: WALK_JITTER_DEG,
            tile_url_template: DEFAULT_TILE_URL.to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Reads a JSON config; missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let _timing = logging::start_timing("load_config",
            OperationCategory::FileIO { subcategory: FileIOType::ConfigLoad });

        let file = File::open(path.as_ref())?;
        let config: ExplorerConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.origin.is_finite() {
            return Err(ConfigError::Invalid("origin must be a finite coordinate".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if !(self.geofence_threshold_deg > 0.0) {
            return Err(ConfigError::Invalid("geofence_threshold_deg must be positive".into()));
        }
        if !(self.walk_jitter_deg >= 0.0 && self.walk_jitter_deg <= MAX_WALK_JITTER_DEG) {
            return Err(ConfigError::Invalid(format!(
                "walk_jitter_deg must be between 0 and {}",
                MAX_WALK_JITTER_DEG
            )));
        }
        if !(self.fog.reveal_radius_px >= 0.0) {
            return Err(ConfigError::Invalid("fog.reveal_radius_px must not be negative".into()));
        }
        if !TileSource::is_valid_template(&self.tile_url_template) {
            return Err(ConfigError::Invalid(format!(
                "tile_url_template needs {{z}}, {{x}} and {{y}}: {}",
                self.tile_url_template
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn initial_camera(&self) -> Camera {
        Camera::new(self.origin, self.viewport.zoom, self.viewport.width, self.viewport.height)
    }
}
