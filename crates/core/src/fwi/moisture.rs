//! Canadian Forest Fire Weather Index (FWI) System: fuel moisture codes
//!
//! Implements the three daily moisture-code transitions:
//! - Fine Fuel Moisture Code (FFMC): surface litter, ~2/3 day timelag
//! - Duff Moisture Code (DMC): loosely compacted organic layer, ~15 day timelag
//! - Drought Code (DC): deep compact organic layer, seasonal timelag
//!
//! Each code is a pure function of yesterday's code and today's weather. Every
//! logarithm, power and square root is preceded by a domain clamp so no branch can
//! produce NaN once the weather sample itself is finite.
//!
//! # Scientific References
//! - Van Wagner, C.E. (1987). "Development and Structure of the Canadian Forest Fire
//!   Weather Index System". Canadian Forestry Service, Forestry Technical Report 35
//! - Van Wagner, C.E. & Pickett, T.L. (1985). "Equations and FORTRAN program for the
//!   Canadian Forest Fire Weather Index System". Forestry Technical Report 33

use crate::core_types::weather::WeatherSample;
use crate::numeric::non_negative;
use serde::{Deserialize, Serialize};

/// FFMC valid range
pub const FFMC_MAX: f64 = 101.0;

/// Rain (mm) that must be exceeded before the FFMC rain routine applies
pub const FFMC_RAIN_THRESHOLD_MM: f64 = 0.5;

/// Rain (mm) that must be exceeded before the DMC rain routine applies
pub const DMC_RAIN_THRESHOLD_MM: f64 = 1.5;

/// Rain (mm) that must be exceeded before the DC rain routine applies
pub const DC_RAIN_THRESHOLD_MM: f64 = 2.8;

/// Lowest temperature the DMC drying term accepts (°C)
pub const DMC_MIN_TEMPERATURE: f64 = -1.1;

/// Upper bound on post-rain fine fuel moisture content (%)
const FFMC_MAX_MOISTURE: f64 = 250.0;

/// Effective day length (hours) for the DMC drying term, January..December
///
/// Van Wagner (1987), Table 1 (46°N reference latitude)
pub const DMC_DAY_LENGTH: [f64; 12] = [6.5, 7.5, 9.0, 12.8, 13.9, 13.9, 12.4, 10.9, 9.4, 8.0, 7.0, 6.0];

/// Effective day length for a 1-based month; out-of-range months clamp to Jan/Dec
#[inline]
pub fn day_length(month: u32) -> f64 {
    let index = month.clamp(1, 12) as usize - 1;
    DMC_DAY_LENGTH[index]
}

/// Convert FFMC to fine fuel moisture content (%)
///
/// `m = 147.2 × (101 − F) / (59.5 + F)`, with F clamped to [0, 101]
#[inline]
pub fn ffmc_to_moisture(ffmc: f64) -> f64 {
    let ffmc = clamp_ffmc(ffmc);
    147.2 * (FFMC_MAX - ffmc) / (59.5 + ffmc)
}

/// Convert fine fuel moisture content (%) back to FFMC, clamped to [0, 101]
#[inline]
pub fn moisture_to_ffmc(moisture: f64) -> f64 {
    let moisture = non_negative(moisture);
    clamp_ffmc(59.5 * (FFMC_MAX_MOISTURE - moisture) / (147.2 + moisture))
}

#[inline]
fn clamp_ffmc(ffmc: f64) -> f64 {
    if ffmc.is_nan() {
        0.0
    } else {
        ffmc.clamp(0.0, FFMC_MAX)
    }
}

#[inline]
fn clamp_humidity(rh: f64) -> f64 {
    if rh.is_nan() {
        0.0
    } else {
        rh.clamp(0.0, 100.0)
    }
}

/// Fine fuel moisture after rain
///
/// Van Wagner (1987) eq. 3a/3b. `rf = R − 0.5` is the effective rain; the second
/// term only applies to fuels already wetter than 150%.
fn ffmc_rain_moisture(mo: f64, rain_mm: f64) -> f64 {
    let rf = rain_mm - FFMC_RAIN_THRESHOLD_MM;
    let mut mr = mo + 42.5 * rf * (-100.0 / (251.0 - mo)).exp() * (1.0 - (-6.93 / rf).exp());
    if mo > 150.0 {
        mr += 0.0015 * (mo - 150.0).powi(2) * rf.sqrt();
    }
    mr.min(FFMC_MAX_MOISTURE)
}

/// Equilibrium moisture contents (drying `Ed`, wetting `Ew`) for fine fuels
///
/// Van Wagner (1987) eq. 4 and 5
pub fn fine_fuel_equilibrium(temperature: f64, rh: f64) -> (f64, f64) {
    let rh = clamp_humidity(rh);
    let shared = 0.18 * (21.1 - temperature) * (1.0 - (-0.115 * rh).exp());
    let ed = 0.942 * rh.powf(0.679) + 11.0 * ((rh - 100.0) / 10.0).exp() + shared;
    let ew = 0.618 * rh.powf(0.753) + 10.0 * ((rh - 100.0) / 10.0).exp() + shared;
    (ed, ew)
}

/// Log drying (`ko`) or wetting (`kw`) rate for fine fuels
///
/// Pass `rh` for drying and `100 − rh` for wetting; both share the same form
/// (Van Wagner 1987 eq. 6 and 7) with the `0.581 × exp(0.0365 T)` temperature term.
fn fine_fuel_rate(humidity_term: f64, wind_kmh: f64, temperature: f64) -> f64 {
    let h = clamp_humidity(humidity_term) / 100.0;
    let wind = non_negative(wind_kmh);
    let base = 0.424 * (1.0 - h.powf(1.7)) + 0.0694 * wind.sqrt() * (1.0 - h.powi(8));
    base * 0.581 * (0.0365 * temperature).exp()
}

/// Calculate today's Fine Fuel Moisture Code
///
/// # Arguments
/// * `ffmc_prev` - Yesterday's FFMC (clamped to [0, 101])
/// * `temperature` - Air temperature (°C)
/// * `rh` - Relative humidity (%)
/// * `wind_kmh` - Wind speed (km/h)
/// * `rain_mm` - 24 h rain (mm); the rain routine needs strictly more than 0.5 mm
///
/// # Returns
/// FFMC in [0, 101]
pub fn ffmc_next(ffmc_prev: f64, temperature: f64, rh: f64, wind_kmh: f64, rain_mm: f64) -> f64 {
    let mo = ffmc_to_moisture(ffmc_prev);

    let mr = if rain_mm > FFMC_RAIN_THRESHOLD_MM {
        ffmc_rain_moisture(mo, rain_mm)
    } else {
        mo
    };

    let (ed, ew) = fine_fuel_equilibrium(temperature, rh);

    let m = if mr > ed {
        let ko = fine_fuel_rate(rh, wind_kmh, temperature);
        ed + (mr - ed) * (-ko).exp()
    } else if mr < ew {
        let kw = fine_fuel_rate(100.0 - clamp_humidity(rh), wind_kmh, temperature);
        ew - (ew - mr) * (-kw).exp()
    } else {
        mr
    };

    moisture_to_ffmc(m)
}

/// Slope coefficient `b` of the DMC rain routine, piecewise in yesterday's DMC
///
/// Van Wagner (1987) eq. 13a-c
fn dmc_rain_slope(dmc_prev: f64) -> f64 {
    if dmc_prev <= 33.0 {
        100.0 / (0.5 + 0.3 * dmc_prev)
    } else if dmc_prev <= 65.0 {
        14.0 - 1.3 * dmc_prev.ln()
    } else {
        6.2 * dmc_prev.ln() - 17.2
    }
}

/// DMC after rain (before today's drying is added)
///
/// Van Wagner (1987) eq. 11-16
fn dmc_after_rain(dmc_prev: f64, rain_mm: f64) -> f64 {
    let re = non_negative(0.92 * rain_mm - 1.27);
    let mo = 20.0 + (5.6348 - dmc_prev / 43.43).exp();
    let b = dmc_rain_slope(dmc_prev);
    let mr = mo + 1000.0 * re / (48.77 + b * re);
    // mr > 20 whenever re >= 0 and b > 0; keep the log argument positive regardless
    let excess = (mr - 20.0).max(f64::MIN_POSITIVE);
    non_negative(244.72 - 43.43 * excess.ln())
}

/// Calculate today's Duff Moisture Code
///
/// # Arguments
/// * `dmc_prev` - Yesterday's DMC (floored at 0)
/// * `temperature` - Air temperature (°C), raised to at least -1.1
/// * `rh` - Relative humidity (%)
/// * `rain_mm` - 24 h rain (mm); the rain routine needs strictly more than 1.5 mm
/// * `month` - Month of year (1-12) for the day-length table
///
/// # Returns
/// DMC ≥ 0
pub fn dmc_next(dmc_prev: f64, temperature: f64, rh: f64, rain_mm: f64, month: u32) -> f64 {
    let dmc_prev = non_negative(dmc_prev);
    let temperature = temperature.max(DMC_MIN_TEMPERATURE);
    let rh = clamp_humidity(rh);

    // K = 1.894 (T + 1.1)(100 − H) Le × 10⁻⁶
    let k = 1.894 * (temperature + 1.1) * (100.0 - rh) * day_length(month) * 1e-6;

    let base = if rain_mm > DMC_RAIN_THRESHOLD_MM {
        dmc_after_rain(dmc_prev, rain_mm)
    } else {
        dmc_prev
    };

    non_negative(base + 100.0 * k)
}

/// Calculate today's Drought Code
///
/// Rain above 2.8 mm removes `400 re / (re + 800)` with `re = 0.83 R − 1.27`;
/// otherwise the code dries by `0.05 T`.
///
/// # Returns
/// DC ≥ 0
pub fn dc_next(dc_prev: f64, temperature: f64, rain_mm: f64) -> f64 {
    let dc_prev = non_negative(dc_prev);
    let dc = if rain_mm > DC_RAIN_THRESHOLD_MM {
        let re = non_negative(0.83 * rain_mm - 1.27);
        dc_prev - 400.0 * re / (re + 800.0)
    } else {
        dc_prev + 0.05 * temperature
    };
    non_negative(dc)
}

/// Fuel-dryness memory carried from one day to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelMoistureState {
    /// Fine Fuel Moisture Code, [0, 101]
    pub ffmc: f64,
    /// Duff Moisture Code, ≥ 0
    pub dmc: f64,
    /// Drought Code, ≥ 0
    pub dc: f64,
}

impl FuelMoistureState {
    /// Standard spring start-up values (Van Wagner 1987)
    pub const STARTUP: FuelMoistureState = FuelMoistureState {
        ffmc: 85.0,
        dmc: 6.0,
        dc: 15.0,
    };

    /// Create a state, clamping each code into its valid range
    pub fn new(ffmc: f64, dmc: f64, dc: f64) -> Self {
        FuelMoistureState {
            ffmc: clamp_ffmc(ffmc),
            dmc: non_negative(dmc),
            dc: non_negative(dc),
        }
    }

    /// Advance one day
    #[must_use]
    pub fn advance(&self, sample: &WeatherSample) -> FuelMoistureState {
        let t = *sample.temperature();
        let rh = *sample.relative_humidity();
        let w = *sample.wind_speed();
        let r = *sample.precipitation();

        FuelMoistureState {
            ffmc: ffmc_next(self.ffmc, t, rh, w, r),
            dmc: dmc_next(self.dmc, t, rh, r, sample.month()),
            dc: dc_next(self.dc, t, r),
        }
    }
}

impl Default for FuelMoistureState {
    fn default() -> Self {
        Self::STARTUP
    }
}
