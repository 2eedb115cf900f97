//! In-memory provider backed by a JSON document
//!
//! ```json
//! {
//!   "weather": {
//!     "2024-08-01": {
//!       "observation": {"temperature": 303.15, "dewpoint": 283.15, "wind_u": 3.0, "wind_v": 4.0},
//!       "total_precipitation_m": 0.0
//!     }
//!   },
//!   "terrain": {"slope_deg": 12.0, "aspect_deg": 200.0},
//!   "wind": {"u": 2.0, "v": -1.0},
//!   "fire_pixels": {"2024-08-01": [{"mask": 8, "frp_mw": 85.0}]},
//!   "population_density": 140.0
//! }
//! ```
//!
//! Dates absent from `weather` answer with no data, which exercises the fallback path.

use super::{
    ActiveFireAggregate, DailyWeatherAggregate, GeoScalarProvider, TerrainAggregate,
    WindAggregate,
};
use crate::core_types::AreaOfInterest;
use crate::error::{FireDangerError, ProviderError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One active-fire pixel: its confidence mask class and radiative power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirePixel {
    pub mask: u8,
    pub frp_mw: f64,
}

/// Provider answering from fixed data; every query point sees the same values
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureProvider {
    pub weather: BTreeMap<NaiveDate, DailyWeatherAggregate>,
    pub terrain: TerrainAggregate,
    pub wind: WindAggregate,
    pub fire_pixels: BTreeMap<NaiveDate, Vec<FirePixel>>,
    pub population_density: Option<f64>,

    /// Artificial delay added to every call
    pub latency_ms: u64,

    /// Operation names that fail as unavailable (`"daily_weather"`, `"terrain"`, ...)
    pub unavailable: BTreeSet<String>,

    #[serde(skip)]
    weather_calls: AtomicUsize,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, FireDangerError> {
        serde_json::from_str(json)
            .map_err(|e| FireDangerError::Config(format!("invalid fixture JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FireDangerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            FireDangerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    #[must_use]
    pub fn with_weather(mut self, date: NaiveDate, weather: DailyWeatherAggregate) -> Self {
        self.weather.insert(date, weather);
        self
    }

    #[must_use]
    pub fn with_terrain(mut self, slope_deg: f64, aspect_deg: f64) -> Self {
        self.terrain = TerrainAggregate {
            slope_deg: Some(slope_deg),
            aspect_deg: Some(aspect_deg),
        };
        self
    }

    #[must_use]
    pub fn with_wind(mut self, u: f64, v: f64) -> Self {
        self.wind = WindAggregate {
            u: Some(u),
            v: Some(v),
        };
        self
    }

    #[must_use]
    pub fn with_fire_pixels(mut self, date: NaiveDate, pixels: Vec<FirePixel>) -> Self {
        self.fire_pixels.insert(date, pixels);
        self
    }

    #[must_use]
    pub fn with_population(mut self, density: f64) -> Self {
        self.population_density = Some(density);
        self
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Make `operation` fail as unavailable
    #[must_use]
    pub fn failing(mut self, operation: &str) -> Self {
        self.unavailable.insert(operation.to_string());
        self
    }

    /// How many `daily_weather` calls reached this provider
    pub fn weather_calls(&self) -> usize {
        self.weather_calls.load(Ordering::Relaxed)
    }

    fn enter(&self, operation: &'static str) -> Result<(), ProviderError> {
        if self.latency_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.latency_ms));
        }
        if self.unavailable.contains(operation) {
            return Err(ProviderError::unavailable(operation, "fixture marked unavailable"));
        }
        Ok(())
    }
}

impl GeoScalarProvider for FixtureProvider {
    fn daily_weather(
        &self,
        _aoi: &AreaOfInterest,
        date: NaiveDate,
        _observation_hour: u32,
    ) -> Result<DailyWeatherAggregate, ProviderError> {
        self.weather_calls.fetch_add(1, Ordering::Relaxed);
        self.enter("daily_weather")?;
        Ok(self.weather.get(&date).copied().unwrap_or_default())
    }

    fn terrain(&self, _aoi: &AreaOfInterest) -> Result<TerrainAggregate, ProviderError> {
        self.enter("terrain")?;
        Ok(self.terrain)
    }

    fn wind(
        &self,
        _aoi: &AreaOfInterest,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<WindAggregate, ProviderError> {
        self.enter("wind")?;
        Ok(self.wind)
    }

    fn active_fire(
        &self,
        _aoi: &AreaOfInterest,
        date: NaiveDate,
        confidence_threshold: u8,
    ) -> Result<ActiveFireAggregate, ProviderError> {
        self.enter("active_fire")?;
        let burning: Vec<f64> = self
            .fire_pixels
            .get(&date)
            .map(|pixels| {
                pixels
                    .iter()
                    .filter(|p| p.mask >= confidence_threshold)
                    .map(|p| p.frp_mw)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ActiveFireAggregate {
            frp_max_mw: burning.iter().copied().reduce(f64::max),
            fire_present: !burning.is_empty(),
        })
    }

    fn population_density(&self, _aoi: &AreaOfInterest) -> Result<Option<f64>, ProviderError> {
        self.enter("population_density")?;
        Ok(self.population_density)
    }
}
