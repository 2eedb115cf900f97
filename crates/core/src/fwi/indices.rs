//! Fire behaviour indices derived from the moisture codes
//!
//! - Initial Spread Index (ISI): FFMC + wind
//! - Buildup Index (BUI): DMC + DC
//! - Fire Weather Index (FWI): ISI + BUI
//!
//! All three are same-day pure functions; none carries state between days.
//!
//! # References
//! Van Wagner (1987), equations 24-30

use super::moisture::ffmc_to_moisture;
use crate::numeric::non_negative;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// BUI at which the duff function switches from the power law to the rational form
const BUI_DUFF_BREAKPOINT: f64 = 80.0;

/// Initial Spread Index
///
/// `ISI = 0.208 × exp(0.05039 W) × 91.9 exp(−0.1386 m)(1 + m^5.31 / 4.93e7)`
///
/// # Arguments
/// * `ffmc` - Today's FFMC (clamped to [0, 101])
/// * `wind_kmh` - Wind speed (km/h), floored at 0
pub fn initial_spread_index(ffmc: f64, wind_kmh: f64) -> f64 {
    let m = ffmc_to_moisture(ffmc);
    let wind_factor = (0.05039 * non_negative(wind_kmh)).exp();
    let fine_fuel_factor = 91.9 * (-0.1386 * m).exp() * (1.0 + m.powf(5.31) / 4.93e7);
    non_negative(0.208 * wind_factor * fine_fuel_factor)
}

/// Buildup Index
///
/// Harmonic-style blend of DMC and DC; DMC dominates, DC only adds weight when
/// the duff is already dry.
pub fn buildup_index(dmc: f64, dc: f64) -> f64 {
    let dmc = non_negative(dmc);
    let dc = non_negative(dc);
    let c04 = 0.4 * dc;
    let c08 = 0.8 * dc;
    let denom = dmc + c04;
    if denom <= 0.0 {
        return 0.0;
    }

    let bui = if dmc <= c04 {
        dmc * c08 / denom
    } else {
        let correction = (1.0 - c08 / denom) * (0.92 + (0.0114 * dmc).powf(1.7));
        dmc - correction
    };
    non_negative(bui)
}

/// Duff moisture function `fD` of the FWI
///
/// The published rational form starts ~0.02 below the power law at the breakpoint;
/// it is held at the breakpoint value until it catches up so FWI never falls as BUI
/// rises.
fn duff_function(bui: f64) -> f64 {
    let power_law = |u: f64| 0.626 * u.powf(0.809) + 2.0;
    if bui <= BUI_DUFF_BREAKPOINT {
        power_law(bui)
    } else {
        let rational = 1000.0 / (25.0 + 108.64 * (-0.023 * bui).exp());
        rational.max(power_law(BUI_DUFF_BREAKPOINT))
    }
}

/// Fire Weather Index
///
/// `B = 0.1 × ISI × fD(BUI)`; FWI is `B` itself up to 1, then
/// `exp(2.72 (0.434 ln B)^0.647)`.
pub fn fire_weather_index(isi: f64, bui: f64) -> f64 {
    let isi = non_negative(isi);
    let bui = non_negative(bui);
    let b = 0.1 * isi * duff_function(bui);
    let fwi = if b <= 1.0 {
        b
    } else {
        (2.72 * (0.434 * b.ln()).powf(0.647)).exp()
    };
    non_negative(fwi)
}

/// One day of fire behaviour indices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyIndices {
    pub date: NaiveDate,
    pub isi: f64,
    pub bui: f64,
    pub fwi: f64,
}

impl DailyIndices {
    /// Compute ISI, BUI and FWI from the day's codes and wind
    pub fn compute(date: NaiveDate, ffmc: f64, dmc: f64, dc: f64, wind_kmh: f64) -> Self {
        let isi = initial_spread_index(ffmc, wind_kmh);
        let bui = buildup_index(dmc, dc);
        DailyIndices {
            date,
            isi,
            bui,
            fwi: fire_weather_index(isi, bui),
        }
    }

    /// All-zero record substituted when the query day is missing from a series
    pub fn zeroed(date: NaiveDate) -> Self {
        DailyIndices {
            date,
            isi: 0.0,
            bui: 0.0,
            fwi: 0.0,
        }
    }
}
