//! Multi-day FWI recurrence
//!
//! Chains the moisture codes across an ordered run of daily weather samples. Day `i`
//! needs day `i−1`'s state, so the loop is strictly sequential; only the weather
//! retrieval that feeds it may run concurrently (see [`crate::provider`]).

use super::indices::DailyIndices;
use super::moisture::FuelMoistureState;
use crate::core_types::weather::WeatherSample;
use crate::error::FireDangerError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One computed day: the weather that drove it, the codes after it, and its indices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FwiDay {
    pub weather: WeatherSample,
    pub moisture: FuelMoistureState,
    pub indices: DailyIndices,
}

/// Daily FWI output for a contiguous window, oldest day first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FwiSeries {
    days: Vec<FwiDay>,
}

/// Check that samples are one per calendar day, ascending, with no gaps
pub fn validate_daily_sequence(samples: &[WeatherSample]) -> Result<(), FireDangerError> {
    for pair in samples.windows(2) {
        let (prev, next) = (pair[0].date(), pair[1].date());
        if prev.succ_opt() != Some(next) {
            return Err(FireDangerError::InvalidInput(format!(
                "weather samples must be consecutive days: {prev} is followed by {next}"
            )));
        }
    }
    Ok(())
}

impl FwiSeries {
    /// Run the recurrence from `initial` over `samples`
    ///
    /// Returns one [`FwiDay`] per sample. Fails only if the samples are not a
    /// gap-free ascending daily sequence.
    pub fn run(
        initial: FuelMoistureState,
        samples: &[WeatherSample],
    ) -> Result<FwiSeries, FireDangerError> {
        validate_daily_sequence(samples)?;

        let mut state = FuelMoistureState::new(initial.ffmc, initial.dmc, initial.dc);
        let mut days = Vec::with_capacity(samples.len());

        for sample in samples {
            state = state.advance(sample);
            let indices = DailyIndices::compute(
                sample.date(),
                state.ffmc,
                state.dmc,
                state.dc,
                *sample.wind_speed(),
            );

            debug!(
                "FWI day {}: T={:.1}°C RH={:.0}% W={:.1}km/h R={:.1}mm -> FFMC={:.2} DMC={:.2} DC={:.2} ISI={:.2} BUI={:.2} FWI={:.2}",
                sample.date(),
                *sample.temperature(),
                *sample.relative_humidity(),
                *sample.wind_speed(),
                *sample.precipitation(),
                state.ffmc,
                state.dmc,
                state.dc,
                indices.isi,
                indices.bui,
                indices.fwi
            );

            days.push(FwiDay {
                weather: *sample,
                moisture: state,
                indices,
            });
        }

        Ok(FwiSeries { days })
    }

    /// All computed days, oldest first
    pub fn days(&self) -> &[FwiDay] {
        &self.days
    }

    /// Number of days in the series
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns `true` if no days were computed
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The computed day for `date`, if present
    pub fn day(&self, date: NaiveDate) -> Option<&FwiDay> {
        self.days.iter().find(|d| d.indices.date == date)
    }

    /// Indices for `date`, or an all-zero record when the day is not in the series
    pub fn select(&self, date: NaiveDate) -> DailyIndices {
        if let Some(day) = self.day(date) {
            day.indices
        } else {
            warn!("No FWI output for {date}; substituting zeroed indices");
            DailyIndices::zeroed(date)
        }
    }

    /// Final moisture state, if any day was computed
    pub fn final_state(&self) -> Option<FuelMoistureState> {
        self.days.last().map(|d| d.moisture)
    }
}
