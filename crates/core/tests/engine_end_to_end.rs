//! End-to-end queries through the engine with fixture and synthetic providers

use approx::assert_abs_diff_eq;
use chrono::{NaiveDate, TimeZone, Utc};
use fire_danger_core::core_types::{Kelvin, MetersPerSecond, Millimeters};
use fire_danger_core::provider::fixture::FirePixel;
use fire_danger_core::provider::DailyWeatherAggregate;
use fire_danger_core::threat::spread_index;
use fire_danger_core::{
    CachedProvider, CompassSector, EngineConfig, ErrorBody, ErrorCode, FireDangerEngine,
    FireDangerError, FixtureProvider, FuelMoistureState, FwiSeries, GeoPoint, HourlyObservation,
    LabelLocale, ProviderError, SyntheticProvider, ThreatLevel, ThreatQuery, ThreatRequest,
    ThreatWeights, WeatherSample,
};
use serde_json::json;
use std::time::{Duration, Instant};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const HOT_DRY: HourlyObservation = HourlyObservation {
    temperature: Kelvin::new(303.15),
    dewpoint: Kelvin::new(283.15),
    wind_u: MetersPerSecond::new(3.0),
    wind_v: MetersPerSecond::new(4.0),
};

fn aug(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
}

fn dry_day() -> DailyWeatherAggregate {
    DailyWeatherAggregate {
        observation: Some(HOT_DRY),
        total_precipitation_m: Some(0.0),
    }
}

fn query_on(day: u32) -> ThreatQuery {
    ThreatQuery::new(
        GeoPoint::new(36.2, 37.15),
        Utc.with_ymd_and_hms(2024, 8, day, 13, 0, 0).unwrap(),
        ThreatWeights::default(),
    )
}

/// Three dry August days, a slope, an easterly-blowing wind and one confident fire pixel
fn scenario_fixture() -> FixtureProvider {
    FixtureProvider::new()
        .with_weather(aug(1), dry_day())
        .with_weather(aug(2), dry_day())
        .with_weather(aug(3), dry_day())
        .with_terrain(15.0, 200.0)
        .with_wind(2.0, 0.0)
        .with_fire_pixels(
            aug(3),
            vec![
                FirePixel { mask: 8, frp_mw: 120.0 },
                FirePixel { mask: 6, frp_mw: 500.0 },
            ],
        )
        .with_population(250.0)
}

fn config_with_spinup(days: u32) -> EngineConfig {
    EngineConfig {
        spinup_days: days,
        ..EngineConfig::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Threat
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_threat_report_from_fixture() {
    let engine = FireDangerEngine::new(scenario_fixture(), config_with_spinup(2)).unwrap();
    let report = engine.assess_threat(&query_on(3)).unwrap();

    let samples: Vec<_> = (1..=3)
        .map(|d| WeatherSample::from_observation(aug(d), &HOT_DRY, Millimeters::new(0.0)))
        .collect();
    let series = FwiSeries::run(FuelMoistureState::STARTUP, &samples).unwrap();
    let expected = series.select(aug(3));

    assert_eq!(report.date, aug(3));
    assert_abs_diff_eq!(report.fwi_day, expected.fwi, epsilon = 1e-12);
    assert_abs_diff_eq!(report.isi_day, expected.isi, epsilon = 1e-12);

    // The mask-6 pixel is below the confidence threshold
    assert_eq!(report.frp_max_mw, 120.0);
    assert_abs_diff_eq!(report.fire_power_norm, 0.6, epsilon = 1e-12);
    assert!(report.fire_present);

    assert_abs_diff_eq!(report.exposure_norm, 0.5, epsilon = 1e-12);
    let caps = engine.config().caps;
    assert_abs_diff_eq!(report.spread_index, spread_index(expected.fwi, 15.0, &caps), epsilon = 1e-12);

    let w = report.weights;
    let score = 0.6 * w.w_fire() + report.spread_index * w.w_spread() + 0.5 * w.w_exposure();
    assert_abs_diff_eq!(report.threat_score, score, epsilon = 1e-12);
    assert_eq!(report.threat_level, ThreatLevel::classify(score));
    assert_eq!(report.threat_level_label, report.threat_level.to_string());
    assert_eq!(report.aoi_center.lat, 36.2);
}

#[test]
fn test_missing_days_use_fallback_weather() {
    let fixture = FixtureProvider::new().with_weather(aug(3), dry_day());
    let engine = FireDangerEngine::new(fixture, config_with_spinup(2)).unwrap();
    let report = engine.assess_threat(&query_on(3)).unwrap();

    let samples = [
        WeatherSample::fallback(aug(1)),
        WeatherSample::fallback(aug(2)),
        WeatherSample::from_observation(aug(3), &HOT_DRY, Millimeters::new(0.0)),
    ];
    let series = FwiSeries::run(FuelMoistureState::STARTUP, &samples).unwrap();
    assert_abs_diff_eq!(report.fwi_day, series.select(aug(3)).fwi, epsilon = 1e-12);

    // No terrain, fire or population data
    assert_eq!(report.frp_max_mw, 0.0);
    assert_eq!(report.population_mean, 0.0);
    assert!(!report.fire_present);
}

#[test]
fn test_spinup_changes_the_result() {
    let short = FireDangerEngine::new(scenario_fixture(), config_with_spinup(0)).unwrap();
    let long = FireDangerEngine::new(scenario_fixture(), config_with_spinup(2)).unwrap();
    let a = short.assess_threat(&query_on(3)).unwrap();
    let b = long.assess_threat(&query_on(3)).unwrap();
    // Two extra drying days raise the fine-fuel dryness and therefore ISI
    assert!(b.isi_day > a.isi_day);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Spread
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_spread_report_from_fixture() {
    let engine = FireDangerEngine::new(scenario_fixture(), EngineConfig::default()).unwrap();
    let report = engine.assess_spread(&query_on(3)).unwrap();

    assert_abs_diff_eq!(report.upslope_deg, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(report.wind_to_deg, 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(report.wind_speed_ms, 2.0, epsilon = 1e-12);
    assert_eq!(report.slope_deg, 15.0);
    assert!(report.bearing_deg > 20.0 && report.bearing_deg < 90.0);
    assert_eq!(report.sector, CompassSector::from_bearing(report.bearing_deg));
    assert_eq!(report.sector_label, report.sector.to_string());
}

#[test]
fn test_arabic_labels() {
    let config = EngineConfig {
        locale: LabelLocale::Arabic,
        ..EngineConfig::default()
    };
    let engine = FireDangerEngine::new(scenario_fixture(), config).unwrap();
    let assessment = engine.assess(&query_on(3)).unwrap();

    let threat = assessment.threat.unwrap();
    let spread = assessment.spread.unwrap();
    assert_eq!(threat.threat_level_label, threat.threat_level.label(LabelLocale::Arabic));
    assert_eq!(spread.sector_label, spread.sector.label(LabelLocale::Arabic));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Provider failures
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_slow_provider_fails_the_query() {
    let fixture = scenario_fixture().with_latency(Duration::from_millis(60));
    let config = EngineConfig {
        provider_timeout_secs: 0.01,
        ..EngineConfig::default()
    };
    let engine = FireDangerEngine::new(fixture, config).unwrap();

    let err = engine.assess_threat(&query_on(3)).unwrap_err();
    assert!(matches!(
        err,
        FireDangerError::ComputationFailed(ProviderError::Timeout { .. })
    ));
    assert_eq!(err.code(), ErrorCode::CalculationFailed);
    assert_eq!(ErrorBody::from(&err).error, "calculation_failed");
}

#[test]
fn test_blocked_provider_fails_at_the_deadline() {
    let fixture = scenario_fixture().with_latency(Duration::from_secs(2));
    let config = EngineConfig {
        provider_timeout_secs: 0.05,
        ..EngineConfig::default()
    };
    let engine = FireDangerEngine::new(fixture, config).unwrap();

    let started = Instant::now();
    let threat = engine.assess_threat(&query_on(3));
    let spread = engine.assess_spread(&query_on(3));
    let elapsed = started.elapsed();

    assert!(matches!(
        threat,
        Err(FireDangerError::ComputationFailed(ProviderError::Timeout { .. }))
    ));
    assert!(matches!(
        spread,
        Err(FireDangerError::ComputationFailed(ProviderError::Timeout { .. }))
    ));
    // Two queries, each bounded by the 50 ms deadline rather than the 2 s call
    assert!(elapsed < Duration::from_secs(1), "queries took {elapsed:?}");
}

#[test]
fn test_unavailable_provider_fails_whole_assessment() {
    let fixture = scenario_fixture().failing("population_density");
    let engine = FireDangerEngine::new(fixture, EngineConfig::default()).unwrap();

    // Spread does not need population data
    assert!(engine.assess_spread(&query_on(3)).is_ok());

    let err = engine.assess(&query_on(3)).unwrap_err();
    assert!(!err.is_client_error());
    assert!(matches!(
        err,
        FireDangerError::ComputationFailed(ProviderError::Unavailable {
            operation: "population_density",
            ..
        })
    ));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Caching
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_cached_provider_dedups_overlapping_windows() {
    let cached = CachedProvider::new(scenario_fixture().with_weather(aug(4), dry_day()));
    let engine = FireDangerEngine::new(cached, config_with_spinup(3)).unwrap();

    let first = engine.assess_threat(&query_on(3)).unwrap();
    assert_eq!(engine.provider().inner().weather_calls(), 4);

    engine.assess_threat(&query_on(4)).unwrap();
    // Only Aug 4 is new
    assert_eq!(engine.provider().inner().weather_calls(), 5);

    let again = engine.assess_threat(&query_on(3)).unwrap();
    assert_eq!(first, again);
    assert_eq!(engine.provider().inner().weather_calls(), 5);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Synthetic provider
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_synthetic_assessment_is_deterministic_and_bounded() {
    let engine = FireDangerEngine::new(SyntheticProvider::new(2024), config_with_spinup(10)).unwrap();
    for day in [1, 9, 17, 25] {
        let a = engine.assess(&query_on(day)).unwrap();
        let b = engine.assess(&query_on(day)).unwrap();
        assert_eq!(a, b);

        let threat = a.threat.unwrap();
        assert!((0.0..=1.0).contains(&threat.threat_score));
        assert!(threat.fwi_day >= 0.0);
        let spread = a.spread.unwrap();
        assert!((0.0..360.0).contains(&spread.bearing_deg));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Request surface
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_request_to_json_report() {
    let engine = FireDangerEngine::new(scenario_fixture(), EngineConfig::default()).unwrap();
    let request: ThreatRequest = serde_json::from_value(json!({
        "lat": "36.2",
        "lon": 37.15,
        "datetime": "2024-08-03T13:00:00Z",
        "w_fire": 1.0
    }))
    .unwrap();

    let query = request.validate(&engine.config().default_weights).unwrap();
    let assessment = engine.assess(&query).unwrap();
    let value = serde_json::to_value(&assessment).unwrap();

    let threat = &value["threat"];
    assert_eq!(threat["date"], json!("2024-08-03"));
    assert_eq!(threat["aoi_center"], json!({"lon": 37.15, "lat": 36.2}));
    assert!(threat["threat_level"].is_string());
    assert!(threat["weights"]["w_fire"].as_f64().unwrap() > 0.25);
    assert!(value["spread"]["sector_label"].is_string());
}

#[test]
fn test_missing_fields_never_reach_the_provider() {
    let engine = FireDangerEngine::new(scenario_fixture(), EngineConfig::default()).unwrap();
    let request: ThreatRequest = serde_json::from_value(json!({"lat": 36.2})).unwrap();

    let err = request.validate(&engine.config().default_weights).unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(
        serde_json::to_value(ErrorBody::from(&err)).unwrap(),
        json!({"error": "Missing lat/lon/datetime"})
    );
    assert_eq!(engine.provider().weather_calls(), 0);
}
