//! Geospatial scalar provider boundary
//!
//! The engine never touches rasters. A [`GeoScalarProvider`] hands it region
//! aggregates (means, maxima) for an [`AreaOfInterest`], and this module turns those
//! into the typed inputs the numeric core consumes.
//!
//! Missing data is `None`, never an error; errors mean the provider itself failed and
//! the query must fail with it.

pub mod cache;
pub mod fixture;
pub mod prefetch;
pub mod synthetic;

pub use cache::CachedProvider;
pub use fixture::FixtureProvider;
pub use prefetch::{fetch_pool, prefetch_daily_weather, window_dates};
pub use synthetic::SyntheticProvider;

use crate::core_types::{AreaOfInterest, HourlyObservation, Millimeters, WeatherSample};
use crate::error::ProviderError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Observation-hour fields and the daily rain total for one day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyWeatherAggregate {
    /// Mean temperature, dew point and wind at the observation hour
    pub observation: Option<HourlyObservation>,
    /// Total precipitation over the day (metres of water)
    pub total_precipitation_m: Option<f64>,
}

impl DailyWeatherAggregate {
    /// Convert to a daily sample, substituting the neutral fallback for missing fields
    pub fn into_sample(self, date: NaiveDate) -> WeatherSample {
        let observation = self.observation.unwrap_or_else(|| {
            warn!("No weather observation for {date}; using neutral fallback");
            HourlyObservation::FALLBACK
        });
        let rain = match self.total_precipitation_m {
            Some(m) if m.is_finite() => Millimeters::from_meters(m),
            _ => {
                warn!("No precipitation total for {date}; assuming 0 mm");
                Millimeters::new(0.0)
            }
        };
        WeatherSample::from_observation(date, &observation, rain)
    }
}

/// Mean terrain scalars over a region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TerrainAggregate {
    /// Mean slope (degrees)
    pub slope_deg: Option<f64>,
    /// Mean aspect, the downslope bearing (degrees)
    pub aspect_deg: Option<f64>,
}

/// Mean 10 m wind components over a region and time window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindAggregate {
    /// Eastward component (m/s)
    pub u: Option<f64>,
    /// Northward component (m/s)
    pub v: Option<f64>,
}

/// Active-fire detections over a region for one day
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActiveFireAggregate {
    /// Maximum fire radiative power over pixels meeting the confidence threshold (MW)
    pub frp_max_mw: Option<f64>,
    /// Whether any pixel met the confidence threshold
    pub fire_present: bool,
}

/// Source of region-aggregated geospatial scalars
///
/// Implementations are shared across threads and may block on network I/O.
pub trait GeoScalarProvider: Send + Sync {
    /// Weather at `observation_hour` (UTC) on `date`, plus that day's rain total
    fn daily_weather(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        observation_hour: u32,
    ) -> Result<DailyWeatherAggregate, ProviderError>;

    /// Mean slope and aspect
    fn terrain(&self, aoi: &AreaOfInterest) -> Result<TerrainAggregate, ProviderError>;

    /// Mean wind components over `[start, end)`
    fn wind(
        &self,
        aoi: &AreaOfInterest,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<WindAggregate, ProviderError>;

    /// Active-fire summary for `date`, counting pixels whose mask class is at least
    /// `confidence_threshold`
    fn active_fire(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        confidence_threshold: u8,
    ) -> Result<ActiveFireAggregate, ProviderError>;

    /// Mean population density
    fn population_density(&self, aoi: &AreaOfInterest) -> Result<Option<f64>, ProviderError>;
}

impl<P: GeoScalarProvider + ?Sized> GeoScalarProvider for Arc<P> {
    fn daily_weather(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        observation_hour: u32,
    ) -> Result<DailyWeatherAggregate, ProviderError> {
        (**self).daily_weather(aoi, date, observation_hour)
    }

    fn terrain(&self, aoi: &AreaOfInterest) -> Result<TerrainAggregate, ProviderError> {
        (**self).terrain(aoi)
    }

    fn wind(
        &self,
        aoi: &AreaOfInterest,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<WindAggregate, ProviderError> {
        (**self).wind(aoi, start, end)
    }

    fn active_fire(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        confidence_threshold: u8,
    ) -> Result<ActiveFireAggregate, ProviderError> {
        (**self).active_fire(aoi, date, confidence_threshold)
    }

    fn population_density(&self, aoi: &AreaOfInterest) -> Result<Option<f64>, ProviderError> {
        (**self).population_density(aoi)
    }
}

/// Run one provider call against a deadline
///
/// The call runs on its own thread and the caller waits at most `limit` for it. On
/// overrun the caller gets [`ProviderError::Timeout`] straight away and the call is
/// left to finish detached; its late answer is dropped.
pub fn timed<T, F>(operation: &'static str, limit: Duration, call: F) -> Result<T, ProviderError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
{
    let started = Instant::now();
    let (tx, rx) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name(format!("provider-{operation}"))
        .spawn(move || {
            // The receiver is gone once the deadline has passed
            let _ = tx.send(call());
        })
        .map_err(|e| ProviderError::unavailable(operation, format!("cannot spawn call: {e}")))?;

    match rx.recv_timeout(limit) {
        Ok(result) => {
            debug!("Provider call '{operation}' finished in {:?}", started.elapsed());
            result
        }
        Err(RecvTimeoutError::Timeout) => {
            let elapsed = started.elapsed();
            warn!("Provider call '{operation}' still running after {elapsed:?}; abandoning it");
            Err(ProviderError::Timeout {
                operation,
                elapsed,
                limit,
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(ProviderError::unavailable(
            operation,
            "provider call panicked",
        )),
    }
}

/// [`timed`] for a call on a shared provider
///
/// The provider handle is cloned into the call so an abandoned call can outlive the
/// query that made it.
pub fn call_provider<P, T, F>(
    provider: &Arc<P>,
    operation: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, ProviderError>
where
    P: GeoScalarProvider + ?Sized + 'static,
    T: Send + 'static,
    F: FnOnce(&P) -> Result<T, ProviderError> + Send + 'static,
{
    let provider = Arc::clone(provider);
    timed(operation, limit, move || call(&*provider))
}
