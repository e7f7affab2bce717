use thiserror::Error;
use tracing::{debug, info};

use crate::geo::projection::{Camera, Projection};
use crate::geo::tiles::{visible_tiles, TileSource};
use crate::render::surface::FogSurface;

#[derive(Debug, Error)]
pub enum MapInitError {
    #[error("viewport has no area ({width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
    #[error("camera center is not a finite coordinate")]
    InvalidCenter,
    #[error("tile template needs {{z}}, {{x}} and {{y}}: {0}")]
    InvalidTileTemplate(String),
}

/// The live map view and the fog surface drawn over it. Both are acquired in
/// [`MapHandle::open`] and released together when the handle is dropped.
#[derive(Debug)]
pub struct MapHandle {
    projection: Projection,
    surface: FogSurface,
    tiles: TileSource,
}

impl MapHandle {
    pub fn open(camera: Camera, fog_color: [u8; 3], tile_template: &str) -> Result<Self, MapInitError> {
        if !camera.has_area() {
            return Err(MapInitError::EmptyViewport {
                width: camera.width(),
                height: camera.height(),
            });
        }
        if !camera.center().is_finite() {
            return Err(MapInitError::InvalidCenter);
        }
        if !TileSource::is_valid_template(tile_template) {
            return Err(MapInitError::InvalidTileTemplate(tile_template.to_string()));
        }

        info!(
            "Opened map at ({:.4}, {:.4}) zoom {} with {}x{} viewport",
            camera.center().lat, camera.center().lng, camera.zoom(), camera.width(), camera.height()
        );

        Ok(Self {
            projection: Projection::new(camera),
            surface: FogSurface::new(camera.width(), camera.height(), fog_color),
            tiles: TileSource::new(tile_template),
        })
    }

    pub fn camera(&self) -> Camera {
        *self.projection.camera()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn surface(&self) -> &FogSurface {
        &self.surface
    }

    /// Installs a new camera. The surface follows the viewport size before
    /// anything is drawn with the new projection.
    pub fn set_camera(&mut self, camera: Camera) {
        if self.surface.resize(camera.width(), camera.height()) {
            debug!("Fog surface resized to {}x{}", camera.width(), camera.height());
        }
        self.projection = Projection::new(camera);
    }

    pub fn visible_tile_urls(&self) -> Vec<String> {
        visible_tiles(&self.projection)
            .iter()
            .map(|tile| self.tiles.url(tile))
            .collect()
    }

    pub(crate) fn draw_parts(&mut self) -> (&mut FogSurface, &Projection) {
        (&mut self.surface, &self.projection)
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        debug!("Map handle released");
    }
}
