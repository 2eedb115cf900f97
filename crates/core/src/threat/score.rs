//! Weighted threat score and its three-level classification
//!
//! Each component is mapped onto [0, 1] against a saturation cap:
//! ```text
//! fire_power   = clamp(FRP / frp_max)
//! slope_factor = 1 + clamp(slope / slope_cap) × slope_boost
//! spread_index = clamp(clamp(FWI / fwi_cap) × slope_factor)
//! exposure     = clamp(population / population_max)
//! score        = clamp(Σ component × weight)
//! ```

use super::weights::ThreatWeights;
use crate::config::{LabelLocale, NormalizationCaps};
use crate::numeric::{clamp_unit, normalize_to_cap};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threat score ranges for classification
pub mod threat_ranges {
    use std::ops::{Range, RangeFrom};

    /// "Low" threat `[0.0, 0.33)`
    pub const LOW: Range<f64> = 0.0..0.33;

    /// "Medium" threat `[0.33, 0.66)`
    pub const MEDIUM: Range<f64> = 0.33..0.66;

    /// "High" threat `[0.66, ∞)`; scores never exceed 1.0
    pub const HIGH: RangeFrom<f64> = 0.66..;
}

/// Three-level threat classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    /// Classify a score. See [`threat_ranges`] for thresholds.
    #[must_use]
    pub fn classify(score: f64) -> Self {
        match score {
            s if s < threat_ranges::MEDIUM.start => ThreatLevel::Low,
            s if s < threat_ranges::HIGH.start => ThreatLevel::Medium,
            _ => ThreatLevel::High,
        }
    }

    pub fn label(self, locale: LabelLocale) -> &'static str {
        match (locale, self) {
            (LabelLocale::English, ThreatLevel::Low) => "Low",
            (LabelLocale::English, ThreatLevel::Medium) => "Medium",
            (LabelLocale::English, ThreatLevel::High) => "High",
            (LabelLocale::Arabic, ThreatLevel::Low) => "منخفضة",
            (LabelLocale::Arabic, ThreatLevel::Medium) => "متوسطة",
            (LabelLocale::Arabic, ThreatLevel::High) => "عالية",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(LabelLocale::English))
    }
}

/// Raw scalars feeding the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThreatInputs {
    /// Maximum fire radiative power over burning pixels (MW)
    pub frp_max_mw: f64,
    /// Mean slope (degrees)
    pub slope_deg: f64,
    /// FWI of the query day
    pub fwi: f64,
    /// Mean population density
    pub population_mean: f64,
    /// Whether any pixel met the active-fire confidence threshold
    pub fire_present: bool,
}

/// Per-query threat output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatResult {
    pub fire_power_norm: f64,
    pub spread_index: f64,
    pub exposure_norm: f64,
    pub threat_score: f64,
    pub threat_level: ThreatLevel,
    pub fire_present: bool,
}

/// Slope multiplier on the FWI component, in `[1, 1 + slope_boost]`
pub fn slope_factor(slope_deg: f64, caps: &NormalizationCaps) -> f64 {
    1.0 + normalize_to_cap(slope_deg, caps.slope_cap_deg) * caps.slope_boost
}

/// Slope-adjusted, FWI-derived spread component
pub fn spread_index(fwi: f64, slope_deg: f64, caps: &NormalizationCaps) -> f64 {
    clamp_unit(normalize_to_cap(fwi, caps.fwi_cap) * slope_factor(slope_deg, caps))
}

/// Normalize, weight and classify
pub fn compute_threat(
    inputs: &ThreatInputs,
    weights: &ThreatWeights,
    caps: &NormalizationCaps,
) -> ThreatResult {
    let fire_power_norm = normalize_to_cap(inputs.frp_max_mw, caps.frp_max_mw);
    let spread_index = spread_index(inputs.fwi, inputs.slope_deg, caps);
    let exposure_norm = normalize_to_cap(inputs.population_mean, caps.population_max);

    let threat_score = clamp_unit(
        fire_power_norm * weights.w_fire()
            + spread_index * weights.w_spread()
            + exposure_norm * weights.w_exposure(),
    );

    ThreatResult {
        fire_power_norm,
        spread_index,
        exposure_norm,
        threat_score,
        threat_level: ThreatLevel::classify(threat_score),
        fire_present: inputs.fire_present,
    }
}
