//! Importance weights for the three threat components

use serde::{Deserialize, Serialize};

/// Lower bound applied to each raw weight before renormalization
pub const MIN_WEIGHT: f64 = 0.10;
/// Upper bound applied to each raw weight before renormalization
pub const MAX_WEIGHT: f64 = 1.0;

/// Weights as supplied by a caller, before clamping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawWeights {
    pub w_fire: f64,
    pub w_spread: f64,
    pub w_exposure: f64,
}

impl Default for RawWeights {
    /// Exposure-leaning defaults: fire 0.25, spread 0.35, exposure 0.40
    fn default() -> Self {
        Self {
            w_fire: 0.25,
            w_spread: 0.35,
            w_exposure: 0.40,
        }
    }
}

/// Normalized weights; always sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatWeights {
    w_fire: f64,
    w_spread: f64,
    w_exposure: f64,
}

fn clamp_weight(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(MIN_WEIGHT, MAX_WEIGHT)
    } else {
        MIN_WEIGHT
    }
}

impl ThreatWeights {
    /// Clamp each weight to [0.10, 1.0], then rescale so the three sum to 1
    ///
    /// Non-finite weights count as the minimum. Because every clamped weight is at
    /// least 0.10 the sum is never zero.
    #[must_use]
    pub fn new(w_fire: f64, w_spread: f64, w_exposure: f64) -> Self {
        let fire = clamp_weight(w_fire);
        let spread = clamp_weight(w_spread);
        let exposure = clamp_weight(w_exposure);
        let total = fire + spread + exposure;

        Self {
            w_fire: fire / total,
            w_spread: spread / total,
            w_exposure: exposure / total,
        }
    }

    pub fn w_fire(&self) -> f64 {
        self.w_fire
    }

    pub fn w_spread(&self) -> f64 {
        self.w_spread
    }

    pub fn w_exposure(&self) -> f64 {
        self.w_exposure
    }

    pub fn sum(&self) -> f64 {
        self.w_fire + self.w_spread + self.w_exposure
    }
}

impl From<RawWeights> for ThreatWeights {
    fn from(raw: RawWeights) -> Self {
        ThreatWeights::new(raw.w_fire, raw.w_spread, raw.w_exposure)
    }
}

impl Default for ThreatWeights {
    fn default() -> Self {
        RawWeights::default().into()
    }
}
