use std::collections::HashMap;

use super::projection::{lat_to_world_y, lng_to_world_x, Projection};
use crate::config::constants::{DEFAULT_TILE_SUBDOMAINS, MAX_ZOOM, TILE_SIZE};
use crate::data::poi::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoords {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoords {
    /// The tile at integer zoom `z` that contains `coord`.
    pub fn containing(coord: &Coordinate, z: u8) -> Self {
        let z = z.min(MAX_ZOOM as u8);
        let n = 1_i64 << z;
        let x_raw = (lng_to_world_x(coord.lng, z as f64) / TILE_SIZE).floor() as i64;
        let y_raw = (lat_to_world_y(coord.lat, z as f64) / TILE_SIZE).floor() as i64;

        Self {
            x: x_raw.rem_euclid(n) as u32,
            y: y_raw.clamp(0, n - 1) as u32,
            z,
        }
    }
}

/// Read-only raster backend addressed through a URL template such as
/// `https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png`.
#[derive(Debug, Clone)]
pub struct TileSource {
    template: String,
    subdomains: Vec<String>,
}

impl TileSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subdomains: DEFAULT_TILE_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Templates must address tiles by zoom, column and row.
    pub fn is_valid_template(template: &str) -> bool {
        ["{z}", "{x}", "{y}"].iter().all(|key| template.contains(key))
    }

    pub fn url(&self, tile: &TileCoords) -> String {
        let mut values: HashMap<&str, String> = HashMap::new();
        values.insert("z", tile.z.to_string());
        values.insert("x", tile.x.to_string());
        values.insert("y", tile.y.to_string());
        if self.template.contains("{s}") && !self.subdomains.is_empty() {
            let index = (tile.x as usize + tile.y as usize) % self.subdomains.len();
            values.insert("s", self.subdomains[index].clone());
        }

        let mut url = self.template.clone();
        for (key, value) in &values {
            url = url.replace(&format!("{{{key}}}"), value);
        }
        url
    }
}

/// Tiles needed to cover the viewport of `projection`, row by row.
pub fn visible_tiles(projection: &Projection) -> Vec<TileCoords> {
    let camera = projection.camera();
    if !camera.has_area() {
        return Vec::new();
    }

    let z = camera.zoom().floor().clamp(0.0, MAX_ZOOM) as u8;
    let n = 1_i64 << z;
    // Fractional zoom scales tiles on screen
    let scale = 2.0f64.powf(camera.zoom() - z as f64);
    let origin = projection.world_origin();

    let left = origin.x / scale;
    let top = origin.y / scale;
    let right = left + camera.width() as f64 / scale;
    let bottom = top + camera.height() as f64 / scale;

    let x_start = (left / TILE_SIZE).floor() as i64;
    let x_end = ((right / TILE_SIZE).ceil() as i64 - 1).max(x_start);
    let y_start = ((top / TILE_SIZE).floor() as i64).clamp(0, n - 1);
    let y_end = (((bottom / TILE_SIZE).ceil() as i64) - 1).clamp(0, n - 1);

    let mut tiles = Vec::new();
    for y in y_start..=y_end {
        for x in x_start..=x_end.min(x_start + n - 1) {
            tiles.push(TileCoords {
                x: x.rem_euclid(n) as u32,
                y: y as u32,
                z,
            });
        }
    }
    tiles
}
