//! Daily fire-weather samples
//!
//! The provider reports instantaneous 2 m temperature and dew point (Kelvin) and
//! 10 m wind components (m/s) at the observation hour, plus an accumulated daily
//! precipitation depth (m). The FWI recurrence wants noon-style daily values in
//! Celsius, %, km/h and mm. This module does that conversion once, at the boundary.

use super::units::{Celsius, Kelvin, KilometersPerHour, MetersPerSecond, Millimeters, Percent};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Magnus coefficients for saturation vapour pressure over water (hPa)
const MAGNUS_A: f64 = 6.112;
const MAGNUS_B: f64 = 17.67;
const MAGNUS_C: f64 = 243.5;

/// Saturation vapour pressure (hPa) at `temp`, Magnus approximation
///
/// `es = 6.112 × exp(17.67 T / (T + 243.5))`
#[inline]
pub fn saturation_vapor_pressure(temp: Celsius) -> f64 {
    MAGNUS_A * (MAGNUS_B * *temp / (*temp + MAGNUS_C)).exp()
}

/// Relative humidity from air temperature and dew point
///
/// RH = 100 × e(Td) / es(T), clamped to [0, 100].
pub fn relative_humidity(temp: Celsius, dewpoint: Celsius) -> Percent {
    let es = saturation_vapor_pressure(temp);
    let e = saturation_vapor_pressure(dewpoint);
    if es <= 0.0 || !es.is_finite() {
        return Percent::new(0.0);
    }
    let rh = 100.0 * e / es;
    Percent::new(if rh.is_nan() { 0.0 } else { rh.clamp(0.0, 100.0) })
}

/// Wind speed from east/west (u) and north/south (v) components
#[inline]
pub fn wind_speed(u: MetersPerSecond, v: MetersPerSecond) -> MetersPerSecond {
    MetersPerSecond::new(u.hypot(*v))
}

/// Raw provider fields for the observation hour of one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    /// 2 m air temperature
    pub temperature: Kelvin,
    /// 2 m dew-point temperature
    pub dewpoint: Kelvin,
    /// 10 m eastward wind component
    pub wind_u: MetersPerSecond,
    /// 10 m northward wind component
    pub wind_v: MetersPerSecond,
}

impl HourlyObservation {
    /// Neutral stand-in for a missing observation: freezing air with dew point equal to
    /// temperature and calm wind. Yields T = 0 °C, RH = 100 %, W = 0 km/h.
    pub const FALLBACK: HourlyObservation = HourlyObservation {
        temperature: Kelvin::FREEZING,
        dewpoint: Kelvin::FREEZING,
        wind_u: MetersPerSecond::new(0.0),
        wind_v: MetersPerSecond::new(0.0),
    };
}

/// One day of fire weather, as consumed by the moisture-code recurrence
///
/// Immutable once built; the constructors clamp every field into its physical domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub(crate) date: NaiveDate,
    pub(crate) mean_temperature_celsius: Celsius,
    pub(crate) relative_humidity_pct: Percent,
    pub(crate) wind_speed_kmh: KilometersPerHour,
    pub(crate) precipitation_mm: Millimeters,
    pub(crate) month_number: u32,
}

impl WeatherSample {
    /// Build a sample from already-converted daily values
    ///
    /// Humidity is clamped to [0, 100]; wind and rain are floored at 0. The month is
    /// taken from `date`.
    pub fn new(
        date: NaiveDate,
        temperature: Celsius,
        relative_humidity: Percent,
        wind_speed: KilometersPerHour,
        precipitation: Millimeters,
    ) -> Self {
        let rh = relative_humidity.value();
        let rh = if rh.is_nan() { 0.0 } else { rh.clamp(0.0, 100.0) };
        WeatherSample {
            date,
            mean_temperature_celsius: temperature,
            relative_humidity_pct: Percent::new(rh),
            wind_speed_kmh: KilometersPerHour::new(crate::numeric::non_negative(*wind_speed)),
            precipitation_mm: Millimeters::new(crate::numeric::non_negative(*precipitation)),
            month_number: date.month(),
        }
    }

    /// Derive a sample from the observation-hour fields and the day's rain total
    pub fn from_observation(
        date: NaiveDate,
        observation: &HourlyObservation,
        precipitation: Millimeters,
    ) -> Self {
        let temperature = observation.temperature.to_celsius();
        let dewpoint = observation.dewpoint.to_celsius();
        let rh = relative_humidity(temperature, dewpoint);
        let wind = wind_speed(observation.wind_u, observation.wind_v).to_kmh();
        Self::new(date, temperature, rh, wind, precipitation)
    }

    /// Neutral sample used when the provider has nothing for `date`
    pub fn fallback(date: NaiveDate) -> Self {
        Self::from_observation(date, &HourlyObservation::FALLBACK, Millimeters::new(0.0))
    }

    /// Calendar day of this sample
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Mean air temperature
    pub fn temperature(&self) -> Celsius {
        self.mean_temperature_celsius
    }

    /// Relative humidity
    pub fn relative_humidity(&self) -> Percent {
        self.relative_humidity_pct
    }

    /// Wind speed
    pub fn wind_speed(&self) -> KilometersPerHour {
        self.wind_speed_kmh
    }

    /// 24 h precipitation
    pub fn precipitation(&self) -> Millimeters {
        self.precipitation_mm
    }

    /// Month of year, 1-12
    pub fn month(&self) -> u32 {
        self.month_number
    }
}
