//! Validation suite for the Fire Weather Index recurrence
//!
//! Covers domain bounds of the moisture codes, monotonicity of the FWI combiner,
//! strict rain thresholds, and a two-day drying/rain scenario.
//!
//! # References
//!
//! - Van Wagner, C.E. (1987). Development and structure of the Canadian Forest Fire
//!   Weather Index System. Forestry Technical Report 35.
//!
//! Run tests with: cargo test --test `fwi_validation`

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use fire_danger_core::core_types::{Celsius, KilometersPerHour, Millimeters, Percent};
use fire_danger_core::fwi::{
    buildup_index, dc_next, dmc_next, ffmc_next, fire_weather_index, initial_spread_index,
    DailyIndices, FuelMoistureState, FwiSeries,
};
use fire_danger_core::WeatherSample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn july(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 7, day).unwrap()
}

fn sample(date: NaiveDate, t: f64, rh: f64, w: f64, r: f64) -> WeatherSample {
    WeatherSample::new(
        date,
        Celsius::new(t),
        Percent::new(rh),
        KilometersPerHour::new(w),
        Millimeters::new(r),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Domain bounds
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_moisture_codes_stay_in_domain() {
    let mut rng = StdRng::seed_from_u64(1987);
    for _ in 0..5000 {
        let ffmc = rng.random_range(0.0..=101.0);
        let dmc = rng.random_range(0.0..400.0);
        let dc = rng.random_range(0.0..1000.0);
        let t = rng.random_range(-15.0..45.0);
        let rh = rng.random_range(0.0..=100.0);
        let w = rng.random_range(0.0..90.0);
        let r = if rng.random_bool(0.4) {
            rng.random_range(0.0..80.0)
        } else {
            0.0
        };
        let month = rng.random_range(1..=12);

        let ffmc_today = ffmc_next(ffmc, t, rh, w, r);
        let dmc_today = dmc_next(dmc, t, rh, r, month);
        let dc_today = dc_next(dc, t, r);

        assert!(
            (0.0..=101.0).contains(&ffmc_today),
            "FFMC {ffmc_today} out of range for ffmc={ffmc} T={t} RH={rh} W={w} R={r}"
        );
        assert!(dmc_today >= 0.0 && dmc_today.is_finite(), "DMC {dmc_today}");
        assert!(dc_today >= 0.0 && dc_today.is_finite(), "DC {dc_today}");

        let isi = initial_spread_index(ffmc_today, w);
        let bui = buildup_index(dmc_today, dc_today);
        let fwi = fire_weather_index(isi, bui);
        assert!(isi >= 0.0 && bui >= 0.0 && fwi >= 0.0, "ISI={isi} BUI={bui} FWI={fwi}");
        assert!(fwi.is_finite());
    }
}

#[test]
fn test_out_of_domain_previous_codes_are_clamped() {
    assert!(ffmc_next(250.0, 25.0, 30.0, 10.0, 0.0) <= 101.0);
    assert!(ffmc_next(-20.0, 25.0, 30.0, 10.0, 0.0) >= 0.0);
    assert!(dmc_next(-5.0, 25.0, 30.0, 0.0, 7) >= 0.0);
    assert!(dc_next(-5.0, -30.0, 0.0) >= 0.0);
}

#[test]
fn test_long_series_stays_in_domain() {
    let mut rng = StdRng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
    let samples: Vec<_> = (0..180)
        .map(|offset| {
            let date = start + chrono::Days::new(offset);
            let rain = if rng.random_bool(0.3) {
                rng.random_range(0.0..25.0)
            } else {
                0.0
            };
            sample(
                date,
                rng.random_range(5.0..38.0),
                rng.random_range(10.0..95.0),
                rng.random_range(0.0..45.0),
                rain,
            )
        })
        .collect();

    let series = FwiSeries::run(FuelMoistureState::STARTUP, &samples).unwrap();
    assert_eq!(series.len(), 180);
    for day in series.days() {
        assert!((0.0..=101.0).contains(&day.moisture.ffmc));
        assert!(day.moisture.dmc >= 0.0);
        assert!(day.moisture.dc >= 0.0);
        assert!(day.indices.fwi >= 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FWI combiner monotonicity
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fwi_non_decreasing_in_bui() {
    for isi in [0.0, 0.5, 1.0, 3.0, 8.0, 15.0, 30.0, 60.0] {
        let mut previous = fire_weather_index(isi, 0.0);
        for step in 1..=1200 {
            let bui = f64::from(step) * 0.25;
            let fwi = fire_weather_index(isi, bui);
            assert!(
                fwi >= previous - 1e-12,
                "FWI fell from {previous} to {fwi} at ISI={isi}, BUI={bui}"
            );
            previous = fwi;
        }
    }
}

#[test]
fn test_fwi_non_decreasing_in_isi() {
    for bui in [0.0, 5.0, 20.0, 60.0, 80.0, 80.5, 150.0, 300.0] {
        let mut previous = fire_weather_index(0.0, bui);
        for step in 1..=800 {
            let isi = f64::from(step) * 0.125;
            let fwi = fire_weather_index(isi, bui);
            assert!(
                fwi >= previous - 1e-12,
                "FWI fell from {previous} to {fwi} at ISI={isi}, BUI={bui}"
            );
            previous = fwi;
        }
    }
}

#[test]
fn test_fwi_reference_value() {
    // B = 0.1 × 10 × fD(40) = 19.87 after the exponential transform
    assert_abs_diff_eq!(fire_weather_index(10.0, 40.0), 19.87, epsilon = 0.05);
    assert_eq!(fire_weather_index(0.0, 100.0), 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scenario: drying day followed by a wet day
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_warm_dry_day_raises_all_codes() {
    let start = FuelMoistureState::STARTUP;
    let day1 = start.advance(&sample(july(1), 20.0, 40.0, 10.0, 0.0));

    assert!(day1.ffmc > start.ffmc, "FFMC should rise: {}", day1.ffmc);
    assert!(day1.dmc > start.dmc, "DMC should rise: {}", day1.dmc);
    assert!(day1.dc > start.dc, "DC should rise: {}", day1.dc);

    assert_abs_diff_eq!(day1.ffmc, 87.03, epsilon = 0.05);
    // K = 1.894 × 21.1 × 60 × 12.4 × 1e-6 → +2.973
    assert_abs_diff_eq!(day1.dmc, 8.973, epsilon = 0.001);
    assert_abs_diff_eq!(day1.dc, 16.0, epsilon = 1e-9);
}

#[test]
fn test_rain_day_lowers_ffmc_against_dry_branch() {
    let day1 = FuelMoistureState::STARTUP.advance(&sample(july(1), 20.0, 40.0, 10.0, 0.0));

    let wet = day1.advance(&sample(july(2), 20.0, 40.0, 10.0, 10.0));
    let dry = day1.advance(&sample(july(2), 20.0, 40.0, 10.0, 0.0));

    assert!(wet.ffmc < dry.ffmc, "wet {} vs dry {}", wet.ffmc, dry.ffmc);
    assert!(wet.dmc < dry.dmc);
    assert!(wet.dc < dry.dc);
}

#[test]
fn test_series_matches_manual_chain() {
    let samples = [
        sample(july(1), 20.0, 40.0, 10.0, 0.0),
        sample(july(2), 20.0, 40.0, 10.0, 10.0),
    ];
    let series = FwiSeries::run(FuelMoistureState::STARTUP, &samples).unwrap();

    let day1 = FuelMoistureState::STARTUP.advance(&samples[0]);
    let day2 = day1.advance(&samples[1]);
    assert_eq!(series.final_state(), Some(day2));

    let expected = DailyIndices::compute(july(2), day2.ffmc, day2.dmc, day2.dc, 10.0);
    assert_eq!(series.select(july(2)), expected);
    assert_eq!(series.select(july(3)), DailyIndices::zeroed(july(3)));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rain thresholds are strict inequalities
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_ffmc_rain_threshold_is_strict() {
    let at = ffmc_next(85.0, 20.0, 40.0, 10.0, 0.5);
    let none = ffmc_next(85.0, 20.0, 40.0, 10.0, 0.0);
    let above = ffmc_next(85.0, 20.0, 40.0, 10.0, 0.6);
    assert_eq!(at, none);
    assert!(above < none);
}

#[test]
fn test_dmc_rain_threshold_is_strict() {
    let at = dmc_next(20.0, 20.0, 40.0, 1.5, 7);
    let none = dmc_next(20.0, 20.0, 40.0, 0.0, 7);
    let above = dmc_next(20.0, 20.0, 40.0, 1.6, 7);
    assert_eq!(at, none);
    assert!(above < none);
}

#[test]
fn test_dc_rain_threshold_is_strict() {
    let at = dc_next(100.0, 20.0, 2.8);
    let none = dc_next(100.0, 20.0, 0.0);
    let above = dc_next(100.0, 20.0, 2.9);
    assert_eq!(at, none);
    assert!(above < none);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Fallback sample
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_fallback_sample_is_neutral() {
    let fallback = WeatherSample::fallback(july(5));
    assert_eq!(*fallback.temperature(), 0.0);
    assert_abs_diff_eq!(*fallback.relative_humidity(), 100.0, epsilon = 1e-9);
    assert_eq!(*fallback.wind_speed(), 0.0);
    assert_eq!(*fallback.precipitation(), 0.0);
    assert_eq!(fallback.month(), 7);

    // Saturated, calm, freezing air neither dries the duff nor the deep layers
    let next = FuelMoistureState::STARTUP.advance(&fallback);
    assert_eq!(next.dmc, FuelMoistureState::STARTUP.dmc);
    assert_eq!(next.dc, FuelMoistureState::STARTUP.dc);
}
