//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers keep provider units (Kelvin, m/s, metres of rain) from leaking
//! into the fire-weather equations, which expect Celsius, km/h and millimetres.
//!
//! # Design Philosophy
//! - All quantities are f64; the FWI equations chain exp/ln/pow across days
//! - `Deref` to the raw value so formulas stay readable (`*temp * 0.05`)
//! - Total ordering via `total_cmp` (NaN sorts above all values)
//! - Explicit conversion methods between related types
//! - Serde support (transparent) for fixtures and reports
//!
//! # Usage
//! ```
//! use fire_danger_core::core_types::units::{Celsius, Kelvin, MetersPerSecond};
//!
//! let kelvin = Kelvin::new(293.15);
//! let temp: Celsius = kelvin.into();
//! assert!((*temp - 20.0).abs() < 1e-9);
//!
//! let wind = MetersPerSecond::new(10.0);
//! assert!((*wind.to_kmh() - 36.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Mul, Sub};

/// Implements the shared newtype surface: ordering, deref, arithmetic, raw conversions.
macro_rules! unit_newtype {
    ($name:ident, $suffix:literal) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl $name {
            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2}{}", self.0, $suffix)
            }
        }
    };
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Celsius(f64);

unit_newtype!(Celsius, "°C");

impl Celsius {
    /// Celsius to Kelvin conversion offset (0°C = 273.15 K)
    const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

    /// Water freezing point
    pub const FREEZING: Celsius = Celsius(0.0);

    /// Create a new Celsius temperature
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Celsius(value)
    }

    /// Convert to Kelvin
    #[inline]
    #[must_use]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + Self::CELSIUS_KELVIN_OFFSET)
    }
}

/// Absolute temperature in Kelvin (reanalysis products report 2 m fields this way)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kelvin(f64);

unit_newtype!(Kelvin, "K");

impl Kelvin {
    /// Freezing point of water
    pub const FREEZING: Kelvin = Kelvin(273.15);

    /// Create a new Kelvin temperature
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Kelvin(value)
    }

    /// Convert to Celsius
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> Celsius {
        Celsius(self.0 - Celsius::CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Kelvin {
        c.to_kelvin()
    }
}

impl From<Kelvin> for Celsius {
    fn from(k: Kelvin) -> Celsius {
        k.to_celsius()
    }
}

// ============================================================================
// HUMIDITY
// ============================================================================

/// Percentage (0-100), used for relative humidity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Percent(f64);

unit_newtype!(Percent, "%");

impl Percent {
    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Percent(value)
    }
}

// ============================================================================
// SPEED
// ============================================================================

/// Speed in metres per second (provider wind components)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

unit_newtype!(MetersPerSecond, "m/s");

impl MetersPerSecond {
    /// Create a new speed
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }

    /// Convert to km/h
    #[inline]
    #[must_use]
    pub fn to_kmh(self) -> KilometersPerHour {
        KilometersPerHour(self.0 * 3.6)
    }
}

/// Speed in kilometres per hour (the unit the FWI wind terms are calibrated in)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct KilometersPerHour(f64);

unit_newtype!(KilometersPerHour, "km/h");

impl KilometersPerHour {
    /// Create a new speed
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KilometersPerHour(value)
    }

    /// Convert to m/s
    #[inline]
    #[must_use]
    pub fn to_ms(self) -> MetersPerSecond {
        MetersPerSecond(self.0 / 3.6)
    }
}

impl From<MetersPerSecond> for KilometersPerHour {
    fn from(v: MetersPerSecond) -> Self {
        v.to_kmh()
    }
}

// ============================================================================
// PRECIPITATION
// ============================================================================

/// Precipitation depth in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Millimeters(f64);

unit_newtype!(Millimeters, "mm");

impl Millimeters {
    /// Create a new depth
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Millimeters(value)
    }

    /// Convert a depth in metres (reanalysis accumulation units) to millimetres
    #[inline]
    #[must_use]
    pub fn from_meters(meters: f64) -> Self {
        Millimeters(meters * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin_celsius_round_trip() {
        let t = Celsius::new(21.5);
        let back: Celsius = t.to_kelvin().into();
        assert!((*back - 21.5).abs() < 1e-12);
        assert_eq!(*Kelvin::FREEZING.to_celsius(), 0.0);
    }

    #[test]
    fn test_wind_conversion() {
        let w = MetersPerSecond::new(5.0).to_kmh();
        assert!((*w - 18.0).abs() < 1e-12);
        assert!((*w.to_ms() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_precipitation_from_meters() {
        assert!((*Millimeters::from_meters(0.0125) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_total_ordering() {
        let a = Celsius::new(10.0);
        let b = Celsius::new(20.0);
        assert_eq!(a.max(b), b);
        assert!(Celsius::new(f64::NAN) > b);
    }
}
