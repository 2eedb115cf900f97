//! Engine configuration
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a valid config.

use crate::core_types::BufferShape;
use crate::error::FireDangerError;
use crate::fwi::FuelMoistureState;
use crate::threat::RawWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Language used for sector and threat-level labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelLocale {
    #[default]
    English,
    Arabic,
}

/// Caps that map raw scalars onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationCaps {
    /// FRP at which fire power saturates (MW)
    pub frp_max_mw: f64,
    /// Population density at which exposure saturates (people/km²)
    pub population_max: f64,
    /// FWI at which the spread component saturates
    pub fwi_cap: f64,
    /// Slope at which the slope boost is fully applied (degrees)
    pub slope_cap_deg: f64,
    /// Maximum fractional boost from slope (0.3 = up to +30%)
    pub slope_boost: f64,
}

impl Default for NormalizationCaps {
    fn default() -> Self {
        Self {
            frp_max_mw: 200.0,
            population_max: 500.0,
            fwi_cap: 50.0,
            slope_cap_deg: 45.0,
            slope_boost: 0.3,
        }
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Buffer radius around the query point (metres)
    pub buffer_radius_m: f64,

    /// Region shape for terrain/wind aggregation in spread queries
    pub spread_buffer_shape: BufferShape,

    /// Region shape for threat queries
    pub threat_buffer_shape: BufferShape,

    /// UTC hour whose instantaneous fields make each daily sample
    pub observation_hour_utc: u32,

    /// Days before the query day that also feed the recurrence
    pub spinup_days: u32,

    /// Wind averaging window for spread direction, starting at the query time
    pub wind_window_minutes: u32,

    /// Deadline for each provider call (seconds, fractional allowed)
    pub provider_timeout_secs: f64,

    /// Most daily weather requests in flight at once for one query
    pub max_concurrent_fetches: usize,

    /// Active-fire mask class at or above which a pixel counts as burning
    pub fire_confidence_threshold: u8,

    /// Moisture codes the recurrence starts from
    pub startup: FuelMoistureState,

    pub caps: NormalizationCaps,

    /// Weights used when a request supplies none
    pub default_weights: RawWeights,

    pub locale: LabelLocale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_radius_m: 500.0,
            spread_buffer_shape: BufferShape::BoundingSquare,
            threat_buffer_shape: BufferShape::Circle,
            observation_hour_utc: 9,
            spinup_days: 0,
            wind_window_minutes: 60,
            provider_timeout_secs: 30.0,
            max_concurrent_fetches: 4,
            fire_confidence_threshold: 7,
            startup: FuelMoistureState::STARTUP,
            caps: NormalizationCaps::default(),
            default_weights: RawWeights::default(),
            locale: LabelLocale::English,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, FireDangerError> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| FireDangerError::Config(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FireDangerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            FireDangerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), FireDangerError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(FireDangerError::Config(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        };

        positive("buffer_radius_m", self.buffer_radius_m)?;
        positive("provider_timeout_secs", self.provider_timeout_secs)?;
        positive("caps.frp_max_mw", self.caps.frp_max_mw)?;
        positive("caps.population_max", self.caps.population_max)?;
        positive("caps.fwi_cap", self.caps.fwi_cap)?;
        positive("caps.slope_cap_deg", self.caps.slope_cap_deg)?;

        if !self.caps.slope_boost.is_finite() || self.caps.slope_boost < 0.0 {
            return Err(FireDangerError::Config(format!(
                "caps.slope_boost must be non-negative, got {}",
                self.caps.slope_boost
            )));
        }
        if self.provider_timeout_secs > 86_400.0 {
            return Err(FireDangerError::Config(format!(
                "provider_timeout_secs must be at most one day, got {}",
                self.provider_timeout_secs
            )));
        }
        if !(1..=64).contains(&self.max_concurrent_fetches) {
            return Err(FireDangerError::Config(format!(
                "max_concurrent_fetches must be 1-64, got {}",
                self.max_concurrent_fetches
            )));
        }
        if self.observation_hour_utc > 23 {
            return Err(FireDangerError::Config(format!(
                "observation_hour_utc must be 0-23, got {}",
                self.observation_hour_utc
            )));
        }
        if self.spinup_days > 366 {
            return Err(FireDangerError::Config(format!(
                "spinup_days must be at most 366, got {}",
                self.spinup_days
            )));
        }
        Ok(())
    }

    /// Provider call deadline
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.provider_timeout_secs)
    }

    /// Wind averaging window
    pub fn wind_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.wind_window_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider_timeout(), Duration::from_secs(30));
        assert_eq!(config.spread_buffer_shape, BufferShape::BoundingSquare);
        assert_eq!(config.max_concurrent_fetches, 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"spinup_days": 7, "caps": {"fwi_cap": 80.0}}"#)
                .unwrap();
        assert_eq!(config.spinup_days, 7);
        assert_eq!(config.caps.fwi_cap, 80.0);
        assert_eq!(config.caps.frp_max_mw, 200.0);
        assert_eq!(config.observation_hour_utc, 9);
    }

    #[test]
    fn test_locale_from_json() {
        let config = EngineConfig::from_json_str(r#"{"locale": "arabic"}"#).unwrap();
        assert_eq!(config.locale, LabelLocale::Arabic);
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{"buffer_radius_m": 0}"#,
            r#"{"observation_hour_utc": 24}"#,
            r#"{"provider_timeout_secs": 0}"#,
            r#"{"spinup_days": 400}"#,
            r#"{"max_concurrent_fetches": 0}"#,
            r#"{"caps": {"population_max": -1}}"#,
        ] {
            let err = EngineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, FireDangerError::Config(_)), "{json}");
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(EngineConfig::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_path("/nonexistent/fire-danger.json").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
