use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Web map widgets take `[lng, lat]`; this keeps call sites readable.
    pub fn from_lng_lat(lng: f64, lat: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.lat + d_lat, self.lng + d_lng)
    }

    /// Strict per-axis comparison: both deltas must be below `threshold_deg`.
    pub fn within_box(&self, other: &Coordinate, threshold_deg: f64) -> bool {
        (self.lat - other.lat).abs() < threshold_deg && (self.lng - other.lng).abs() < threshold_deg
    }
}

pub trait POI {
    fn get_coordinate(&self) -> Option<Coordinate>;
}
