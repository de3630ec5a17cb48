use crate::domain::model::GeoPoint;
use serde::{Deserialize, Serialize};

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south_lat: f64,
    pub north_lat: f64,
    pub west_lng: f64,
    pub east_lng: f64,
}

/// Approximates the continental United States.
pub const CONTINENTAL_US: BoundingBox = BoundingBox {
    south_lat: 24.7433195,
    north_lat: 49.3457868,
    west_lng: -124.7844079,
    east_lng: -66.9513812,
};

impl BoundingBox {
    /// NaN fails every comparison, so points with NaN coordinates are outside.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.south_lat <= point.lat
            && point.lat <= self.north_lat
            && self.west_lng <= point.lng
            && point.lng <= self.east_lng
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        CONTINENTAL_US
    }
}

pub fn inside(point: &GeoPoint) -> bool {
    CONTINENTAL_US.contains(point)
}
