//! Core types and utilities

pub mod geo;
pub mod units;
pub mod weather;

pub use geo::{AreaOfInterest, BufferShape, GeoPoint};
pub use units::*;
pub use weather::{HourlyObservation, WeatherSample};
