//! Stock trend lookup, indicators and naive forecasting
//!
//! This crate holds everything behind the trendcast dashboard:
//!
//! - Daily price history from Yahoo Finance
//! - SMA-20, SMA-5 and RSI-14 over the closing prices
//! - A speculative linear projection from the last close toward the 5-day mean
//! - Trend chart rendering (SVG) and recent-data tables
//! - Headlines from NewsAPI
//! - A voice shortcut that turns a spoken ticker into a symbol
//!
//! # Example
//!
//! ```rust,ignore
//! use trendcast_market::{MarketConfig, Pipeline, RequestOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = MarketConfig::builder().with_env_keys().build()?;
//!     let pipeline = Pipeline::from_config(config)?;
//!
//!     match pipeline.run("RELIANCE.NS").await? {
//!         RequestOutcome::Report(report) => println!("{:?}", report.forecast),
//!         RequestOutcome::NoData { message, .. } => println!("{message}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod voice;

pub use config::MarketConfig;
pub use error::{MarketError, Result, TranscriptionFailure};
pub use fetcher::{Fetcher, PriceSource, normalize_ticker};
pub use model::{
    ForecastPoint, ForecastSeries, IndicatorRow, IndicatorSet, Lookback, PricePoint, PriceSeries,
};
pub use pipeline::{NO_DATA_MESSAGE, NO_NEWS_MESSAGE, Pipeline, RequestOutcome, StockReport};
pub use voice::{
    AudioClip, AudioEncoding, CancelToken, SpeechRecognizer, VoiceCapture, VoiceOutcome,
};

// Re-export the provider clients
pub use api::{GoogleSpeechClient, NewsApiClient, NewsArticle, NewsSource, YahooFinanceClient};
