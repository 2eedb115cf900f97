//! Canadian Forest Fire Weather Index System
//!
//! Moisture codes ([`moisture`]) feed the same-day behaviour indices ([`indices`]);
//! [`recurrence`] chains them across a daily window.

pub mod indices;
pub mod moisture;
pub mod recurrence;

pub use indices::{buildup_index, fire_weather_index, initial_spread_index, DailyIndices};
pub use moisture::{dc_next, dmc_next, ffmc_next, FuelMoistureState};
pub use recurrence::{validate_daily_sequence, FwiDay, FwiSeries};
