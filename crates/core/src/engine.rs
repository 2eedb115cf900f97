//! Query orchestration
//!
//! [`FireDangerEngine`] owns an injected provider and a validated config. Each query
//! fetches its scalars, runs the numeric core, and returns a report. Nothing is
//! carried between queries: every threat query restarts the recurrence from the
//! configured start-up codes.
//!
//! Provider calls run against the configured deadline. A call that overruns fails the
//! query at the deadline and is abandoned, so the provider is held behind an `Arc`
//! that the abandoned call keeps alive.

use crate::config::EngineConfig;
use crate::core_types::{AreaOfInterest, GeoPoint};
use crate::error::FireDangerError;
use crate::fwi::FwiSeries;
use crate::numeric::or_default;
use crate::provider::{
    call_provider, fetch_pool, prefetch_daily_weather, window_dates, ActiveFireAggregate,
    GeoScalarProvider, TerrainAggregate,
};
use crate::request::{Assessment, SpreadReport, ThreatQuery, ThreatReport};
use crate::spread::{spread_direction, SpreadGeometry};
use crate::threat::{compute_threat, ThreatInputs};
use chrono::NaiveDate;
use rayon::ThreadPool;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Provider scalar, or 0 with a warning when the region had no data
fn scalar_or_zero(name: &str, value: Option<f64>) -> f64 {
    if value.is_none() {
        warn!("No {name} value from provider; using 0");
    }
    or_default(value, 0.0)
}

/// Non-weather inputs of a threat query
struct ThreatContext {
    fire: ActiveFireAggregate,
    terrain: TerrainAggregate,
    population: Option<f64>,
}

pub struct FireDangerEngine<P: ?Sized> {
    config: EngineConfig,
    fetch_pool: ThreadPool,
    provider: Arc<P>,
}

impl<P: GeoScalarProvider + 'static> FireDangerEngine<P> {
    /// Create an engine; fails if `config` does not validate
    pub fn new(provider: P, config: EngineConfig) -> Result<Self, FireDangerError> {
        Self::with_shared_provider(Arc::new(provider), config)
    }
}

impl<P: GeoScalarProvider + ?Sized + 'static> FireDangerEngine<P> {
    /// Create an engine around a provider that other owners also hold
    pub fn with_shared_provider(
        provider: Arc<P>,
        config: EngineConfig,
    ) -> Result<Self, FireDangerError> {
        config.validate()?;
        let fetch_pool = fetch_pool(config.max_concurrent_fetches)
            .map_err(|e| FireDangerError::Config(format!("cannot start fetch pool: {e}")))?;
        info!(
            "Fire danger engine ready: radius={}m, spin-up={}d, observation hour={:02}:00 UTC, timeout={}s, fetches={}",
            config.buffer_radius_m,
            config.spinup_days,
            config.observation_hour_utc,
            config.provider_timeout_secs,
            config.max_concurrent_fetches
        );
        Ok(Self {
            config,
            fetch_pool,
            provider,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn threat_aoi(&self, point: GeoPoint) -> AreaOfInterest {
        AreaOfInterest::around(point, self.config.buffer_radius_m, self.config.threat_buffer_shape)
    }

    fn spread_aoi(&self, point: GeoPoint) -> AreaOfInterest {
        AreaOfInterest::around(point, self.config.buffer_radius_m, self.config.spread_buffer_shape)
    }

    /// Daily FWI series for the configured window ending on `day`
    pub fn fwi_series(&self, point: GeoPoint, day: NaiveDate) -> Result<FwiSeries, FireDangerError> {
        let aoi = self.threat_aoi(point);
        let dates = window_dates(day, self.config.spinup_days);
        let samples = prefetch_daily_weather(
            &self.fetch_pool,
            &self.provider,
            &aoi,
            &dates,
            self.config.observation_hour_utc,
            self.config.provider_timeout(),
        )?;
        FwiSeries::run(self.config.startup, &samples)
    }

    fn fetch_threat_context(
        &self,
        aoi: &AreaOfInterest,
        day: NaiveDate,
    ) -> Result<ThreatContext, FireDangerError> {
        let limit = self.config.provider_timeout();
        let threshold = self.config.fire_confidence_threshold;
        let aoi = *aoi;

        let fire = call_provider(&self.provider, "active_fire", limit, move |p| {
            p.active_fire(&aoi, day, threshold)
        })?;
        let terrain = call_provider(&self.provider, "terrain", limit, move |p| p.terrain(&aoi))?;
        let population = call_provider(&self.provider, "population_density", limit, move |p| {
            p.population_density(&aoi)
        })?;

        Ok(ThreatContext {
            fire,
            terrain,
            population,
        })
    }

    /// Score fire power, slope-adjusted FWI and exposure for the query day
    pub fn assess_threat(&self, query: &ThreatQuery) -> Result<ThreatReport, FireDangerError> {
        let day = query.date();
        let aoi = self.threat_aoi(query.point);
        info!("Threat assessment for {} on {day}", query.point);

        let (series, context) = rayon::join(
            || self.fwi_series(query.point, day),
            || self.fetch_threat_context(&aoi, day),
        );
        let series = series?;
        let context = context?;

        let indices = series.select(day);
        let frp_max_mw = or_default(context.fire.frp_max_mw, 0.0);
        let population_mean = scalar_or_zero("population density", context.population);

        let inputs = ThreatInputs {
            frp_max_mw,
            slope_deg: scalar_or_zero("slope", context.terrain.slope_deg),
            fwi: indices.fwi,
            population_mean,
            fire_present: context.fire.fire_present,
        };
        let result = compute_threat(&inputs, &query.weights, &self.config.caps);

        info!(
            "Threat for {} on {day}: score={:.3} ({}), FWI={:.2}, fire_present={}",
            query.point, result.threat_score, result.threat_level, indices.fwi, result.fire_present
        );

        Ok(ThreatReport {
            aoi_center: query.point.into(),
            date: day,
            frp_max_mw,
            fire_power_norm: result.fire_power_norm,
            isi_day: indices.isi,
            fwi_day: indices.fwi,
            spread_index: result.spread_index,
            population_mean,
            exposure_norm: result.exposure_norm,
            threat_score: result.threat_score,
            threat_level: result.threat_level,
            threat_level_label: result.threat_level.label(self.config.locale).to_string(),
            fire_present: result.fire_present,
            weights: query.weights,
        })
    }

    /// Expected head-fire direction from terrain and the wind window at the query time
    pub fn assess_spread(&self, query: &ThreatQuery) -> Result<SpreadReport, FireDangerError> {
        let aoi = self.spread_aoi(query.point);
        let limit = self.config.provider_timeout();
        let start = query.timestamp;
        let end = start + self.config.wind_window();
        info!("Spread assessment for {} at {start}", query.point);

        let (terrain, wind) = rayon::join(
            || call_provider(&self.provider, "terrain", limit, move |p| p.terrain(&aoi)),
            || call_provider(&self.provider, "wind", limit, move |p| p.wind(&aoi, start, end)),
        );
        let terrain = terrain?;
        let wind = wind?;

        let geometry = SpreadGeometry::from_terrain_and_wind(
            scalar_or_zero("slope", terrain.slope_deg),
            scalar_or_zero("aspect", terrain.aspect_deg),
            scalar_or_zero("wind u", wind.u),
            scalar_or_zero("wind v", wind.v),
        );
        let direction = spread_direction(&geometry);
        debug!("Spread geometry {geometry:?} -> {direction:?}");

        info!(
            "Spread for {}: {:.1}° ({})",
            query.point, direction.bearing_deg, direction.sector
        );

        Ok(SpreadReport {
            bearing_deg: direction.bearing_deg,
            sector: direction.sector,
            sector_label: direction.sector.label(self.config.locale).to_string(),
            slope_deg: geometry.slope_deg,
            upslope_deg: geometry.upslope_bearing_deg,
            wind_to_deg: geometry.wind_to_deg,
            wind_speed_ms: geometry.wind_speed,
        })
    }

    /// Threat and spread together; either failing fails the whole assessment
    pub fn assess(&self, query: &ThreatQuery) -> Result<Assessment, FireDangerError> {
        let (threat, spread) = rayon::join(|| self.assess_threat(query), || self.assess_spread(query));
        Ok(Assessment {
            threat: Some(threat?),
            spread: Some(spread?),
        })
    }
}
