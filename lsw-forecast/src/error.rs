/// Error types for the forecast analytics engine
use thiserror::Error;

/// Main error type for forecast operations
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Upstream reported no usable records for the selection
    #[error("No data available from {endpoint}")]
    NoData { endpoint: &'static str },

    /// Trend projection needs at least two distinct years
    #[error("Insufficient history for trend projection (needed: 2 distinct years, found: {distinct_years})")]
    InsufficientHistory { distinct_years: usize },

    /// Value rejected at the boundary before reaching the engine
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Threshold set violates min <= criticalLow <= ... <= max
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// Failed to decode a JSON payload
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Failed to write CSV output
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status
    #[cfg(feature = "api")]
    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
