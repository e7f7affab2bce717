//! Web Mercator camera and the coordinate-to-pixel projection derived from it.
//!
//! A [`Projection`] is a snapshot of one camera state. Any camera change
//! produces a new projection; pixel positions computed from an older one are
//! stale and must not be reused.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::config::constants::{MAX_LATITUDE, MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
use crate::data::poi::Coordinate;

/// Screen position in pixels, origin at the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// --- Slippy map / Mercator maths ---

pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2.0f64.powf(zoom)
}

pub fn lng_to_world_x(lng: f64, zoom: f64) -> f64 {
    ((lng + 180.0) / 360.0) * world_size(zoom)
}

pub fn lat_to_world_y(lat: f64, zoom: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * world_size(zoom)
}

pub fn world_x_to_lng(x: f64, zoom: f64) -> f64 {
    (x / world_size(zoom)) * 360.0 - 180.0
}

pub fn world_y_to_lat(y: f64, zoom: f64) -> f64 {
    let n = PI - 2.0 * PI * y / world_size(zoom);
    n.sinh().atan().to_degrees()
}

fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Camera state of the map widget: what is looked at, how closely, through
/// how large a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    center: Coordinate,
    zoom: f64,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(center: Coordinate, zoom: f64, width: u32, height: u32) -> Self {
        Self {
            center: Coordinate::new(
                center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
                wrap_lng(center.lng),
            ),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn with_center(self, center: Coordinate) -> Self {
        Self::new(center, self.zoom, self.width, self.height)
    }

    pub fn with_zoom(self, zoom: f64) -> Self {
        Self::new(self.center, zoom, self.width, self.height)
    }

    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self::new(self.center, self.zoom, width, height)
    }

    /// Moves the view by a pixel offset; positive `dx` looks further east,
    /// positive `dy` further south.
    pub fn pan_by(self, dx: f64, dy: f64) -> Self {
        let projection = Projection::new(self);
        let target = PixelPoint::new(
            self.width as f64 / 2.0 + dx,
            self.height as f64 / 2.0 + dy,
        );
        self.with_center(projection.unproject(target))
    }

    /// Zooms while keeping the geographic point under `anchor` fixed on screen.
    /// Without an anchor the viewport center is kept.
    pub fn zoom_by(self, delta: f64, anchor: Option<PixelPoint>) -> Self {
        let Some(anchor) = anchor else {
            return self.with_zoom(self.zoom + delta);
        };

        let anchored = Projection::new(self).unproject(anchor);
        let zoomed = self.with_zoom(self.zoom + delta);
        let zoom = zoomed.zoom;

        let center_x = lng_to_world_x(anchored.lng, zoom) - anchor.x + self.width as f64 / 2.0;
        let center_y = lat_to_world_y(anchored.lat, zoom) - anchor.y + self.height as f64 / 2.0;
        zoomed.with_center(Coordinate::new(
            world_y_to_lat(center_y, zoom),
            world_x_to_lng(center_x, zoom),
        ))
    }
}

/// Converts coordinates to screen pixels for exactly one camera state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    camera: Camera,
    // World pixel at the top-left corner of the viewport
    origin: PixelPoint,
}

impl Projection {
    pub fn new(camera: Camera) -> Self {
        let zoom = camera.zoom;
        let origin = PixelPoint::new(
            lng_to_world_x(camera.center.lng, zoom) - camera.width as f64 / 2.0,
            lat_to_world_y(camera.center.lat, zoom) - camera.height as f64 / 2.0,
        );
        Self { camera, origin }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn world_origin(&self) -> PixelPoint {
        self.origin
    }

    pub fn project(&self, coord: &Coordinate) -> PixelPoint {
        let zoom = self.camera.zoom;
        let size = world_size(zoom);

        let mut x = lng_to_world_x(coord.lng, zoom) - self.origin.x;
        // Take the copy of the world nearest to the viewport
        let half_view = self.camera.width as f64 / 2.0;
        if x - half_view > size / 2.0 {
            x -= size;
        } else if half_view - x > size / 2.0 {
            x += size;
        }

        PixelPoint::new(x, lat_to_world_y(coord.lat, zoom) - self.origin.y)
    }

    pub fn unproject(&self, point: PixelPoint) -> Coordinate {
        let zoom = self.camera.zoom;
        Coordinate::new(
            world_y_to_lat(point.y + self.origin.y, zoom),
            wrap_lng(world_x_to_lng(point.x + self.origin.x, zoom)),
        )
    }

    /// Whether `point` lies inside the viewport grown by `margin` pixels on every side.
    pub fn is_visible(&self, point: &PixelPoint, margin: f64) -> bool {
        point.x >= -margin
            && point.y >= -margin
            && point.x <= self.camera.width as f64 + margin
            && point.y <= self.camera.height as f64 + margin
    }
}
