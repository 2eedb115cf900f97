//! Request and report shapes for the JSON surface
//!
//! [`ThreatRequest`] is what a caller sends: loosely typed, possibly incomplete.
//! [`ThreatRequest::validate`] turns it into a [`ThreatQuery`] or a client error before
//! anything touches the provider. The report types serialize to the JSON the surface
//! returns.

use crate::core_types::GeoPoint;
use crate::error::FireDangerError;
use crate::spread::CompassSector;
use crate::threat::{RawWeights, ThreatLevel, ThreatWeights};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a required field is absent
pub const MISSING_FIELDS: &str = "Missing lat/lon/datetime";

/// Accepted naive timestamp layouts; all are read as UTC
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Incoming request as the surface received it
///
/// Numeric fields accept JSON numbers or numeric strings, since query-string surfaces
/// deliver everything as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatRequest {
    pub lat: Option<Value>,
    pub lon: Option<Value>,
    pub datetime: Option<String>,
    pub w_fire: Option<Value>,
    pub w_spread: Option<Value>,
    pub w_exposure: Option<Value>,
}

/// A validated query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatQuery {
    pub point: GeoPoint,
    pub timestamp: DateTime<Utc>,
    pub weights: ThreatWeights,
}

impl ThreatQuery {
    pub fn new(point: GeoPoint, timestamp: DateTime<Utc>, weights: ThreatWeights) -> Self {
        Self {
            point,
            timestamp,
            weights,
        }
    }

    /// Calendar day (UTC) the query falls on
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

fn parse_number(field: &str, value: &Value) -> Result<f64, FireDangerError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| FireDangerError::InvalidInput(format!("{field} must be numeric")))
}

fn parse_weight(field: &str, value: Option<&Value>, default: f64) -> Result<f64, FireDangerError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(v) => parse_number(field, v),
    }
}

/// Parse an RFC 3339 timestamp, or a naive date/date-time taken as UTC
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, FireDangerError> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(FireDangerError::InvalidInput(format!(
        "datetime '{text}' is not ISO-8601"
    )))
}

impl ThreatRequest {
    /// Validate into a query
    ///
    /// Weights are resolved first (falling back to `defaults`), then coordinates and
    /// timestamp. Any missing required field gives [`MISSING_FIELDS`].
    pub fn validate(&self, defaults: &RawWeights) -> Result<ThreatQuery, FireDangerError> {
        let weights = ThreatWeights::new(
            parse_weight("w_fire", self.w_fire.as_ref(), defaults.w_fire)?,
            parse_weight("w_spread", self.w_spread.as_ref(), defaults.w_spread)?,
            parse_weight("w_exposure", self.w_exposure.as_ref(), defaults.w_exposure)?,
        );

        let (Some(lat), Some(lon), Some(datetime)) = (
            self.lat.as_ref().filter(|v| !v.is_null()),
            self.lon.as_ref().filter(|v| !v.is_null()),
            self.datetime.as_deref().filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(FireDangerError::InvalidInput(MISSING_FIELDS.to_string()));
        };

        let point = GeoPoint::try_new(parse_number("lat", lat)?, parse_number("lon", lon)?)
            .map_err(FireDangerError::InvalidInput)?;
        let timestamp = parse_timestamp(datetime)?;

        Ok(ThreatQuery::new(point, timestamp, weights))
    }
}

/// Query point echoed back in reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AoiCenter {
    pub lon: f64,
    pub lat: f64,
}

impl From<GeoPoint> for AoiCenter {
    fn from(point: GeoPoint) -> Self {
        Self {
            lon: point.lon,
            lat: point.lat,
        }
    }
}

/// Threat assessment for one point and day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatReport {
    pub aoi_center: AoiCenter,
    pub date: NaiveDate,
    pub frp_max_mw: f64,
    pub fire_power_norm: f64,
    pub isi_day: f64,
    pub fwi_day: f64,
    pub spread_index: f64,
    pub population_mean: f64,
    pub exposure_norm: f64,
    pub threat_score: f64,
    pub threat_level: ThreatLevel,
    pub threat_level_label: String,
    pub fire_present: bool,
    pub weights: ThreatWeights,
}

/// Spread direction for one point and time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadReport {
    pub bearing_deg: f64,
    pub sector: CompassSector,
    pub sector_label: String,
    pub slope_deg: f64,
    pub upslope_deg: f64,
    pub wind_to_deg: f64,
    pub wind_speed_ms: f64,
}

/// Threat and spread reported side by side
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat: Option<ThreatReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<SpreadReport>,
}

/// `{"error": ...}` body
///
/// Client errors carry their message; everything else collapses to the
/// `calculation_failed` code so provider details never leak to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&FireDangerError> for ErrorBody {
    fn from(err: &FireDangerError) -> Self {
        let error = match err {
            FireDangerError::InvalidInput(message) => message.clone(),
            other => other.code().as_str().to_string(),
        };
        Self { error }
    }
}
