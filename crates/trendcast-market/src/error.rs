//! Error types for market data operations

use thiserror::Error;

/// Why a speech transcription did not produce text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptionFailure {
    /// The audio was captured but no words could be recognized
    #[error("could not understand speech")]
    Unintelligible,

    /// The speech service could not be reached or rejected the request
    #[error("speech recognition service unavailable: {0}")]
    Unavailable(String),
}

/// Market data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// Invalid ticker or empty upstream response
    #[error("No data available for {symbol}")]
    NoData { symbol: String },

    /// Upstream API rejected or failed the request
    #[error("API error: {0}")]
    ApiError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Request did not complete within the configured bound
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Fewer points than a rolling window requires
    #[error("Insufficient data for {indicator}: need {required} points, have {available}")]
    InsufficientData {
        indicator: String,
        required: usize,
        available: usize,
    },

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    Indicator(String),

    /// Caller passed a value outside the accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Chart or template rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Writing an artifact to disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<ta::errors::TaError> for MarketError {
    fn from(err: ta::errors::TaError) -> Self {
        MarketError::Indicator(format!("{err:?}"))
    }
}

impl From<minijinja::Error> for MarketError {
    fn from(err: minijinja::Error) -> Self {
        MarketError::Render(err.to_string())
    }
}
