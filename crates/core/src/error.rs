//! Error taxonomy for fire-danger queries
//!
//! Only two kinds of failure ever reach a caller:
//! - input validation ([`FireDangerError::InvalidInput`]), before any computation
//! - provider unavailability or timeout ([`FireDangerError::ComputationFailed`])
//!
//! Missing provider data is not an error (fallback values apply), and the numeric
//! core guards its own domains, so nothing in `fwi`, `spread` or `threat` returns one.

use std::time::Duration;
use thiserror::Error;

/// Failure of a call into the geospatial scalar provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The call did not return within its deadline
    #[error("provider call '{operation}' exceeded its {limit:?} deadline (took {elapsed:?})")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
        limit: Duration,
    },

    /// The provider could not be reached or refused the request
    #[error("provider call '{operation}' failed: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Convenience constructor for [`ProviderError::Unavailable`]
    pub fn unavailable(operation: &'static str, message: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            operation,
            message: message.into(),
        }
    }
}

/// Errors surfaced by the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FireDangerError {
    /// Missing or malformed request data (coordinates, timestamp, sample ordering)
    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// A provider call failed; the whole query fails with no partial result
    #[error("computation failed: {0}")]
    ComputationFailed(#[from] ProviderError),

    /// Engine configuration is unusable
    #[error("configuration error: {0}")]
    Config(String),
}

/// Stable error codes for the request surface.
/// Mirrors the HTTP layer's 4xx/5xx split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Caller sent a bad request; nothing was computed
    InvalidRequest,

    /// Computation could not complete (provider failure or bad configuration)
    CalculationFailed,
}

impl ErrorCode {
    /// Wire string used in `{"error": ...}` bodies
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::CalculationFailed => "calculation_failed",
        }
    }
}

impl FireDangerError {
    /// Error code for the request surface
    pub fn code(&self) -> ErrorCode {
        match self {
            FireDangerError::InvalidInput(_) => ErrorCode::InvalidRequest,
            FireDangerError::ComputationFailed(_) | FireDangerError::Config(_) => {
                ErrorCode::CalculationFailed
            }
        }
    }

    /// `true` when the caller is at fault (maps to a client-error response)
    pub fn is_client_error(&self) -> bool {
        self.code() == ErrorCode::InvalidRequest
    }
}
