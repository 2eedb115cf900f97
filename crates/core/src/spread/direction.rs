//! Head-fire spread direction from terrain and wind
//!
//! Slope and wind are treated as two driving vectors in a frame aligned with the
//! upslope direction: slope pushes straight upslope with magnitude `tan(slope)`, wind
//! pushes along its travel direction with magnitude equal to its speed. The resultant
//! angle, rotated back to compass bearings, is the expected spread direction.
//!
//! This is a direction-only simplification of the Rothermel (1972) slope/wind vector
//! addition; magnitudes are not rate-of-spread.

use crate::config::LabelLocale;
use crate::numeric::normalize_bearing;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steepest slope accepted before `tan` is evaluated (degrees)
const MAX_SLOPE_DEG: f64 = 89.0;

/// Eight 45° compass sectors, clockwise from North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassSector {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassSector {
    /// Sectors in lookup order (index = `floor((bearing + 22.5) / 45) mod 8`)
    pub const ALL: [CompassSector; 8] = [
        CompassSector::North,
        CompassSector::NorthEast,
        CompassSector::East,
        CompassSector::SouthEast,
        CompassSector::South,
        CompassSector::SouthWest,
        CompassSector::West,
        CompassSector::NorthWest,
    ];

    const ENGLISH_LABELS: [&'static str; 8] = [
        "North",
        "North-East",
        "East",
        "South-East",
        "South",
        "South-West",
        "West",
        "North-West",
    ];

    const ARABIC_LABELS: [&'static str; 8] = [
        "شمال",
        "شمال شرق",
        "شرق",
        "جنوب شرق",
        "جنوب",
        "جنوب غرب",
        "غرب",
        "شمال غرب",
    ];

    /// Sector containing `bearing_deg`; each sector is centred on its direction
    pub fn from_bearing(bearing_deg: f64) -> Self {
        let shifted = normalize_bearing(bearing_deg) + 22.5;
        let index = (shifted / 45.0).floor() as usize % 8;
        Self::ALL[index]
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label
    pub fn label(self, locale: LabelLocale) -> &'static str {
        match locale {
            LabelLocale::English => Self::ENGLISH_LABELS[self.index()],
            LabelLocale::Arabic => Self::ARABIC_LABELS[self.index()],
        }
    }
}

impl fmt::Display for CompassSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(LabelLocale::English))
    }
}

/// Terrain and wind scalars for one point and time window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadGeometry {
    /// Mean slope (degrees from horizontal)
    pub slope_deg: f64,
    /// Bearing pointing up the steepest slope
    pub upslope_bearing_deg: f64,
    /// Bearing the wind blows towards (0 = North)
    pub wind_to_deg: f64,
    /// Wind speed (m/s)
    pub wind_speed: f64,
}

impl SpreadGeometry {
    /// Build from terrain aspect (downslope bearing) and u/v wind components (m/s)
    ///
    /// `atan2(u, v)` gives the travel bearing with 0° = North, 90° = East.
    pub fn from_terrain_and_wind(slope_deg: f64, aspect_deg: f64, u: f64, v: f64) -> Self {
        SpreadGeometry {
            slope_deg,
            upslope_bearing_deg: normalize_bearing(aspect_deg + 180.0),
            wind_to_deg: normalize_bearing(u.atan2(v).to_degrees()),
            wind_speed: u.hypot(v),
        }
    }
}

/// Spread bearing and its compass sector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadDirection {
    pub bearing_deg: f64,
    pub sector: CompassSector,
}

/// Combine slope and wind drives into a spread bearing
pub fn spread_direction(geometry: &SpreadGeometry) -> SpreadDirection {
    let slope = if geometry.slope_deg.is_nan() {
        0.0
    } else {
        geometry.slope_deg.clamp(0.0, MAX_SLOPE_DEG)
    };
    let slope_drive = slope.to_radians().tan();
    let wind_drive = crate::numeric::non_negative(geometry.wind_speed);

    // Wind direction relative to upslope, in radians
    let omega = normalize_bearing(geometry.wind_to_deg - geometry.upslope_bearing_deg).to_radians();

    let resultant = Vector2::new(slope_drive, 0.0)
        + Vector2::new(wind_drive * omega.cos(), wind_drive * omega.sin());
    let alpha = resultant.y.atan2(resultant.x).to_degrees();

    let bearing_deg = normalize_bearing(geometry.upslope_bearing_deg + alpha);
    SpreadDirection {
        bearing_deg,
        sector: CompassSector::from_bearing(bearing_deg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_sectors() {
        assert_eq!(CompassSector::from_bearing(0.0), CompassSector::North);
        assert_eq!(CompassSector::from_bearing(90.0), CompassSector::East);
        assert_eq!(CompassSector::from_bearing(180.0), CompassSector::South);
        assert_eq!(CompassSector::from_bearing(270.0), CompassSector::West);
    }

    #[test]
    fn test_sector_edges() {
        assert_eq!(CompassSector::from_bearing(22.4), CompassSector::North);
        assert_eq!(CompassSector::from_bearing(22.5), CompassSector::NorthEast);
        assert_eq!(CompassSector::from_bearing(337.5), CompassSector::North);
        assert_eq!(CompassSector::from_bearing(337.4), CompassSector::NorthWest);
        assert_eq!(CompassSector::from_bearing(-10.0), CompassSector::North);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CompassSector::SouthWest.label(LabelLocale::English), "South-West");
        assert_eq!(CompassSector::North.label(LabelLocale::Arabic), "شمال");
        assert_eq!(CompassSector::East.to_string(), "East");
    }

    #[test]
    fn test_geometry_from_components() {
        // Aspect 270 (slope faces west) → upslope is east; wind from south blows north
        let g = SpreadGeometry::from_terrain_and_wind(10.0, 270.0, 0.0, 5.0);
        assert!((g.upslope_bearing_deg - 90.0).abs() < 1e-9);
        assert!(g.wind_to_deg.abs() < 1e-9);
        assert!((g.wind_speed - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_slope_only_spreads_upslope() {
        let g = SpreadGeometry::from_terrain_and_wind(20.0, 0.0, 0.0, 0.0);
        let d = spread_direction(&g);
        assert!((d.bearing_deg - 180.0).abs() < 1e-9);
        assert_eq!(d.sector, CompassSector::South);
    }

    #[test]
    fn test_wind_dominates_on_flat_ground() {
        // Flat ground, wind blowing toward east
        let g = SpreadGeometry::from_terrain_and_wind(0.0, 0.0, 6.0, 0.0);
        let d = spread_direction(&g);
        assert!((d.bearing_deg - 90.0).abs() < 1e-9);
        assert_eq!(d.sector, CompassSector::East);
    }

    #[test]
    fn test_vertical_slope_is_guarded() {
        let g = SpreadGeometry::from_terrain_and_wind(90.0, 45.0, 1.0, 1.0);
        let d = spread_direction(&g);
        assert!(d.bearing_deg.is_finite());
    }
}
