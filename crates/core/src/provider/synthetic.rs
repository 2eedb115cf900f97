//! Deterministic stand-in provider for demos
//!
//! Every answer is drawn from a [`StdRng`] seeded by the provider seed, the query
//! point and the date (or time), so the same query always sees the same values while
//! nearby days still differ. Temperatures follow a northern-hemisphere seasonal cycle.

use super::{
    ActiveFireAggregate, DailyWeatherAggregate, GeoScalarProvider, TerrainAggregate,
    WindAggregate,
};
use crate::core_types::{AreaOfInterest, GeoPoint, HourlyObservation, Kelvin, MetersPerSecond};
use crate::error::ProviderError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Chance that a given day has measurable rain
const RAIN_PROBABILITY: f64 = 0.25;
/// Chance that a given day has an active-fire detection
const FIRE_PROBABILITY: f64 = 0.15;

#[derive(Debug, Clone, Copy)]
pub struct SyntheticProvider {
    seed: u64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self, point: GeoPoint, salt: u64) -> StdRng {
        let mixed = self.seed
            ^ point.lat.to_bits().rotate_left(17)
            ^ point.lon.to_bits().rotate_left(41)
            ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(mixed)
    }
}

fn day_salt(date: NaiveDate, stream: u64) -> u64 {
    ((i64::from(date.num_days_from_ce()) as u64) << 8) | stream
}

impl GeoScalarProvider for SyntheticProvider {
    fn daily_weather(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        observation_hour: u32,
    ) -> Result<DailyWeatherAggregate, ProviderError> {
        let mut rng = self.rng(aoi.center, day_salt(date, u64::from(observation_hour)));

        // Peak warmth around day 200 (mid-July)
        let season = (TAU * (f64::from(date.ordinal()) - 110.0) / 365.0).sin();
        let temperature_c = 16.0 + 12.0 * season + rng.random_range(-4.0..4.0);
        let dewpoint_c = temperature_c - rng.random_range(2.0..20.0);

        let rain_m = if rng.random_bool(RAIN_PROBABILITY) {
            rng.random_range(0.0..0.015)
        } else {
            0.0
        };

        Ok(DailyWeatherAggregate {
            observation: Some(HourlyObservation {
                temperature: Kelvin::new(temperature_c + Kelvin::FREEZING.value()),
                dewpoint: Kelvin::new(dewpoint_c + Kelvin::FREEZING.value()),
                wind_u: MetersPerSecond::new(rng.random_range(-7.0..7.0)),
                wind_v: MetersPerSecond::new(rng.random_range(-7.0..7.0)),
            }),
            total_precipitation_m: Some(rain_m),
        })
    }

    fn terrain(&self, aoi: &AreaOfInterest) -> Result<TerrainAggregate, ProviderError> {
        let mut rng = self.rng(aoi.center, 1);
        Ok(TerrainAggregate {
            slope_deg: Some(rng.random_range(0.0..35.0)),
            aspect_deg: Some(rng.random_range(0.0..360.0)),
        })
    }

    fn wind(
        &self,
        aoi: &AreaOfInterest,
        start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<WindAggregate, ProviderError> {
        let mut rng = self.rng(aoi.center, start.timestamp() as u64 ^ 2);
        Ok(WindAggregate {
            u: Some(rng.random_range(-8.0..8.0)),
            v: Some(rng.random_range(-8.0..8.0)),
        })
    }

    fn active_fire(
        &self,
        aoi: &AreaOfInterest,
        date: NaiveDate,
        confidence_threshold: u8,
    ) -> Result<ActiveFireAggregate, ProviderError> {
        let mut rng = self.rng(aoi.center, day_salt(date, 3));
        let mask: u8 = rng.random_range(0..=9);
        if rng.random_bool(FIRE_PROBABILITY) && mask >= confidence_threshold {
            Ok(ActiveFireAggregate {
                frp_max_mw: Some(rng.random_range(5.0..260.0)),
                fire_present: true,
            })
        } else {
            Ok(ActiveFireAggregate::default())
        }
    }

    fn population_density(&self, aoi: &AreaOfInterest) -> Result<Option<f64>, ProviderError> {
        let mut rng = self.rng(aoi.center, 4);
        Ok(Some(rng.random_range(0.0..800.0)))
    }
}
