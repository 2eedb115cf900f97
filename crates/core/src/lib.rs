//! Fire Danger Core Library
//!
//! Estimates wildfire danger for a point and time from region-aggregated weather and
//! terrain scalars:
//! - Canadian Forest Fire Weather Index (FWI) system, chained across days
//! - Expected spread direction from slope and wind, as a bearing and compass sector
//! - Weighted threat score from fire power, slope-adjusted FWI and population exposure
//!
//! The numeric core (`fwi`, `spread`, `threat`) is pure and synchronous. Data comes in
//! through the [`GeoScalarProvider`] trait; [`FireDangerEngine`] wires the two together.

// Core types and utilities
pub mod core_types;
pub mod numeric;

// Numeric core
pub mod fwi;
pub mod spread;
pub mod threat;

// Data boundary and orchestration
pub mod config;
pub mod engine;
pub mod error;
pub mod provider;
pub mod request;

// Re-export core types
pub use core_types::{AreaOfInterest, BufferShape, GeoPoint, HourlyObservation, WeatherSample};

pub use config::{EngineConfig, LabelLocale, NormalizationCaps};
pub use engine::FireDangerEngine;
pub use error::{ErrorCode, FireDangerError, ProviderError};
pub use fwi::{DailyIndices, FuelMoistureState, FwiDay, FwiSeries};
pub use provider::{CachedProvider, FixtureProvider, GeoScalarProvider, SyntheticProvider};
pub use request::{
    Assessment, ErrorBody, SpreadReport, ThreatQuery, ThreatReport, ThreatRequest,
};
pub use spread::{spread_direction, CompassSector, SpreadDirection, SpreadGeometry};
pub use threat::{
    compute_threat, RawWeights, ThreatInputs, ThreatLevel, ThreatResult, ThreatWeights,
};
