//! Concurrent retrieval of the daily weather window
//!
//! Days are independent to fetch but not to compute, so the fetch fans out across a
//! small dedicated rayon pool and the results come back in date order for the
//! sequential recurrence. The pool size caps how many requests hit the provider at
//! once, independent of the CPU count.

use super::{call_provider, GeoScalarProvider};
use crate::core_types::{AreaOfInterest, WeatherSample};
use crate::error::ProviderError;
use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Pool that runs at most `max_in_flight` weather requests at a time
pub fn fetch_pool(max_in_flight: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(max_in_flight.max(1))
        .thread_name(|i| format!("weather-fetch-{i}"))
        .build()
}

/// The recurrence window ending on `day`: `[day - spinup_days, day]`, oldest first
pub fn window_dates(day: NaiveDate, spinup_days: u32) -> Vec<NaiveDate> {
    (0..=spinup_days)
        .rev()
        .filter_map(|offset| day.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}

/// Fetch one [`WeatherSample`] per date, concurrently, preserving input order
///
/// Missing observations become fallback samples. Any provider failure (including a
/// deadline overrun) fails the whole window.
pub fn prefetch_daily_weather<P: GeoScalarProvider + ?Sized + 'static>(
    pool: &ThreadPool,
    provider: &Arc<P>,
    aoi: &AreaOfInterest,
    dates: &[NaiveDate],
    observation_hour: u32,
    limit: Duration,
) -> Result<Vec<WeatherSample>, ProviderError> {
    debug!(
        "Prefetching {} day(s) of weather around {} ({} in flight)",
        dates.len(),
        aoi.center,
        pool.current_num_threads()
    );

    let aoi = *aoi;
    pool.install(|| {
        dates
            .par_iter()
            .map(|&date| {
                let aggregate = call_provider(provider, "daily_weather", limit, move |p| {
                    p.daily_weather(&aoi, date, observation_hour)
                })?;
                Ok(aggregate.into_sample(date))
            })
            .collect()
    })
}
