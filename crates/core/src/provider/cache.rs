//! Same point+day deduplication of daily weather calls

use super::{
    ActiveFireAggregate, DailyWeatherAggregate, GeoScalarProvider, TerrainAggregate,
    WindAggregate,
};
use crate::core_types::{AreaOfInterest, BufferShape};
use crate::error::ProviderError;
use chrono::{DateTime, NaiveDate, Utc};
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Cache key: coordinates and radius by bit pattern, so equal floats hash equally.
/// The buffer shape is part of the region, so circle and square answers never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct WeatherKey {
    lat_bits: u64,
    lon_bits: u64,
    radius_bits: u64,
    shape: BufferShape,
    date: NaiveDate,
    hour: u32,
}

impl WeatherKey {
    fn new(aoi: &AreaOfInterest, date: NaiveDate, hour: u32) -> Self {
        Self {
            lat_bits: aoi.center.lat.to_bits(),
            lon_bits: aoi.center.lon.to_bits(),
            radius_bits: aoi.radius_m.to_bits(),
            shape: aoi.shape,
            date,
            hour,
        }
    }
}

/// Wraps a provider and remembers successful `daily_weather` answers per region and day
///
/// Overlapping spin-up windows for the same point then cost one provider call per
/// day. Errors are not cached. All other operations pass straight through.
pub struct CachedProvider<P> {
    inner: P,
    weather: Mutex<FxHashMap<WeatherKey, DailyWeatherAggregate>>,
}

impl<P: GeoScalarProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            weather: Mutex::new(FxHashMap::default()),
        }
    }

    /// The wrapped provider
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached daily answers
    pub fn cached_days(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, FxHashMap<WeatherKey, DailyWeatherAggregate>> {
        self.weather
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<P: GeoScalarProvider> GeoScalarProvider for CachedProvider<P> {
    fn daily_weather(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        observation_hour: u32,
    ) -> Result<DailyWeatherAggregate, ProviderError> {
        let key = WeatherKey::new(aoi, date, observation_hour);
        let cached = self.lock().get(&key).copied();
        if let Some(hit) = cached {
            debug!("Weather cache hit for {} on {date}", aoi.center);
            return Ok(hit);
        }

        // Lock is not held across the provider call; two racing misses both fetch
        let fetched = self.inner.daily_weather(aoi, date, observation_hour)?;
        self.lock().insert(key, fetched);
        Ok(fetched)
    }

    fn terrain(&self, aoi: &AreaOfInterest) -> Result<TerrainAggregate, ProviderError> {
        self.inner.terrain(aoi)
    }

    fn wind(
        &self,
        aoi: &AreaOfInterest,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<WindAggregate, ProviderError> {
        self.inner.wind(aoi, start, end)
    }

    fn active_fire(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        confidence_threshold: u8,
    ) -> Result<ActiveFireAggregate, ProviderError> {
        self.inner.active_fire(aoi, date, confidence_threshold)
    }

    fn population_density(&self, aoi: &AreaOfInterest) -> Result<Option<f64>, ProviderError> {
        self.inner.population_density(aoi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::GeoPoint;
    use crate::provider::{FixtureProvider, SyntheticProvider};

    #[test]
    fn test_repeat_calls_hit_cache() {
        let cached = CachedProvider::new(SyntheticProvider::new(3));
        let aoi = AreaOfInterest::around(GeoPoint::new(10.0, 20.0), 500.0, BufferShape::Circle);
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let first = cached.daily_weather(&aoi, day, 9).unwrap();
        let second = cached.daily_weather(&aoi, day, 9).unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.cached_days(), 1);

        cached.daily_weather(&aoi, day, 12).unwrap();
        assert_eq!(cached.cached_days(), 2);

        cached.clear();
        assert_eq!(cached.cached_days(), 0);
    }

    #[test]
    fn test_buffer_shapes_are_cached_separately() {
        let cached = CachedProvider::new(FixtureProvider::new());
        let point = GeoPoint::new(36.2, 37.15);
        let circle = AreaOfInterest::around(point, 500.0, BufferShape::Circle);
        let square = AreaOfInterest::around(point, 500.0, BufferShape::BoundingSquare);
        let day = NaiveDate::from_ymd_opt(2024, 8, 3).unwrap();

        cached.daily_weather(&circle, day, 9).unwrap();
        cached.daily_weather(&square, day, 9).unwrap();
        assert_eq!(cached.cached_days(), 2);
        assert_eq!(cached.inner().weather_calls(), 2);

        cached.daily_weather(&square, day, 9).unwrap();
        assert_eq!(cached.inner().weather_calls(), 2);
    }
}
