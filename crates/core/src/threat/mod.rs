//! Threat score aggregation: fire power, slope-adjusted FWI and population exposure

pub mod score;
pub mod weights;

pub use score::{
    compute_threat, slope_factor, spread_index, threat_ranges, ThreatInputs, ThreatLevel,
    ThreatResult,
};
pub use weights::{RawWeights, ThreatWeights};
