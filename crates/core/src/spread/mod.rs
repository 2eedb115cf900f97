//! Spread direction (independent of the FWI pipeline)

pub mod direction;

pub use direction::{spread_direction, CompassSector, SpreadDirection, SpreadGeometry};
