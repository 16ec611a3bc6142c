//! Error types for the signal scanner.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum FxSignalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a [`PriceSeries`](crate::types::PriceSeries).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Series contains no bars")]
    Empty,

    #[error("Malformed bar at index {index}: {reason}")]
    MalformedBar { index: usize, reason: String },

    #[error("Timestamps must be strictly increasing: bar {index} at {timestamp} follows {previous}")]
    NonIncreasingTimestamp {
        index: usize,
        timestamp: i64,
        previous: i64,
    },
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error("Indicator failure: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Strategy error: {0}")]
    Internal(String),
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {symbol} ({timeframe})")]
    SymbolNotFound { symbol: String, timeframe: String },

    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Malformed series: {0}")]
    Malformed(#[from] SeriesError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Notification sink errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {description}")]
    Api { status: u16, description: String },

    #[error("All message formats failed; last error: {last}")]
    AllFormatsFailed { last: String },

    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

/// Result type alias for scanner operations.
pub type FxSignalResult<T> = Result<T, FxSignalError>;
