//! Query geometry: the point a user asks about and the buffered region around it

use serde::{Deserialize, Serialize};
use std::fmt;

/// WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, [-180, 180]
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point without validation; see [`GeoPoint::try_new`]
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Create a point, rejecting non-finite or out-of-range coordinates
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, String> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(format!("coordinates must be finite, got lat={lat}, lon={lon}"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("latitude {lat} outside [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("longitude {lon} outside [-180, 180]"));
        }
        Ok(GeoPoint { lat, lon })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// How the buffer around a point is turned into a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferShape {
    /// Disc of the buffer radius
    #[default]
    Circle,
    /// Axis-aligned bounding square of that disc
    BoundingSquare,
}

/// Area of interest (AOI): a point buffered by a radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub shape: BufferShape,
}

impl AreaOfInterest {
    /// Buffer `center` by `radius_m`
    pub fn around(center: GeoPoint, radius_m: f64, shape: BufferShape) -> Self {
        AreaOfInterest {
            center,
            radius_m,
            shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::try_new(40.09, -105.36).is_ok());
        assert!(GeoPoint::try_new(91.0, 0.0).is_err());
        assert!(GeoPoint::try_new(0.0, -180.5).is_err());
        assert!(GeoPoint::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_buffer_shape_serde_names() {
        let json = serde_json::to_string(&BufferShape::BoundingSquare).unwrap();
        assert_eq!(json, "\"bounding_square\"");
    }
}
