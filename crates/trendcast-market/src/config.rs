//! Configuration for market data operations

use crate::analysis::MAX_HORIZON_DAYS;
use crate::error::{MarketError, Result};
use crate::model::Lookback;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default NewsAPI endpoint
pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org";

/// Default Google speech endpoint
pub const DEFAULT_SPEECH_BASE_URL: &str = "https://speech.googleapis.com";

/// Configuration passed to the pipeline entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Ticker shown before the user picks one
    pub default_ticker: String,

    /// Window used by the informational lookup
    pub info_lookback: Lookback,

    /// Window used for chart and analysis
    pub analysis_lookback: Lookback,

    /// Number of calendar days to project
    pub forecast_horizon_days: usize,

    /// Rows shown in the recent data table
    pub recent_rows: usize,

    /// Rows shown by the informational lookup
    pub info_rows: usize,

    /// NewsAPI key (news is skipped when absent)
    pub news_api_key: Option<String>,

    /// NewsAPI base URL
    pub news_base_url: String,

    /// Maximum headlines returned
    pub news_limit: usize,

    /// News requests per minute
    pub news_rate_limit: u32,

    /// Google speech API key (voice input is unavailable when absent)
    pub speech_api_key: Option<String>,

    /// Speech API base URL
    pub speech_base_url: String,

    /// BCP-47 language code sent to the speech service
    pub speech_language: String,

    /// Upper bound on a single transcription
    pub listen_timeout: Duration,

    /// Upper bound on a single upstream request
    pub request_timeout: Duration,

    /// Directory that receives `{ticker}_stock_chart.png`
    pub chart_dir: PathBuf,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            default_ticker: "RELIANCE.NS".to_string(),
            info_lookback: Lookback::OneMonth,
            analysis_lookback: Lookback::ThreeMonths,
            forecast_horizon_days: 5,
            recent_rows: 10,
            info_rows: 5,
            news_api_key: None,
            news_base_url: DEFAULT_NEWS_BASE_URL.to_string(),
            news_limit: 5,
            news_rate_limit: 60,
            speech_api_key: None,
            speech_base_url: DEFAULT_SPEECH_BASE_URL.to_string(),
            speech_language: "en-US".to_string(),
            listen_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            chart_dir: PathBuf::from("."),
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Load API keys and overrides from environment
    pub fn with_env_keys(mut self) -> Self {
        self.apply_lookup(|name| std::env::var(name).ok());
        self
    }

    fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("NEWS_API_KEY") {
            self.news_api_key = Some(key);
        }
        if let Some(key) = non_empty("SPEECH_API_KEY") {
            self.speech_api_key = Some(key);
        }
        if let Some(ticker) = non_empty("TRENDCAST_DEFAULT_TICKER") {
            self.default_ticker = ticker.trim().to_uppercase();
        }
        if let Some(dir) = non_empty("TRENDCAST_CHART_DIR") {
            self.chart_dir = PathBuf::from(dir);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_ticker.trim().is_empty() {
            return Err(MarketError::Config(
                "default_ticker must not be empty".to_string(),
            ));
        }

        if self.forecast_horizon_days == 0 || self.forecast_horizon_days > MAX_HORIZON_DAYS {
            return Err(MarketError::Config(format!(
                "forecast_horizon_days must be between 1 and {MAX_HORIZON_DAYS}"
            )));
        }

        if self.news_rate_limit == 0 {
            return Err(MarketError::Config(
                "news_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.news_limit == 0 {
            return Err(MarketError::Config(
                "news_limit must be greater than 0".to_string(),
            ));
        }

        if self.listen_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(MarketError::Config(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    default_ticker: Option<String>,
    info_lookback: Option<Lookback>,
    analysis_lookback: Option<Lookback>,
    forecast_horizon_days: Option<usize>,
    recent_rows: Option<usize>,
    info_rows: Option<usize>,
    news_api_key: Option<String>,
    news_base_url: Option<String>,
    news_limit: Option<usize>,
    news_rate_limit: Option<u32>,
    speech_api_key: Option<String>,
    speech_base_url: Option<String>,
    speech_language: Option<String>,
    listen_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    chart_dir: Option<PathBuf>,
    from_env: bool,
}

impl MarketConfigBuilder {
    /// Set the ticker used when none is given
    pub fn default_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.default_ticker = Some(ticker.into());
        self
    }

    /// Set the informational lookup window
    pub fn info_lookback(mut self, lookback: Lookback) -> Self {
        self.info_lookback = Some(lookback);
        self
    }

    /// Set the analysis window
    pub fn analysis_lookback(mut self, lookback: Lookback) -> Self {
        self.analysis_lookback = Some(lookback);
        self
    }

    /// Set the forecast horizon in calendar days
    pub fn forecast_horizon_days(mut self, days: usize) -> Self {
        self.forecast_horizon_days = Some(days);
        self
    }

    /// Set the number of recent rows shown
    pub fn recent_rows(mut self, rows: usize) -> Self {
        self.recent_rows = Some(rows);
        self
    }

    /// Set the number of rows in the informational lookup
    pub fn info_rows(mut self, rows: usize) -> Self {
        self.info_rows = Some(rows);
        self
    }

    /// Set NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Point the news client at another host
    pub fn news_base_url(mut self, url: impl Into<String>) -> Self {
        self.news_base_url = Some(url.into());
        self
    }

    /// Set maximum headlines
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set news requests per minute
    pub fn news_rate_limit(mut self, per_minute: u32) -> Self {
        self.news_rate_limit = Some(per_minute);
        self
    }

    /// Set speech API key
    pub fn speech_api_key(mut self, key: impl Into<String>) -> Self {
        self.speech_api_key = Some(key.into());
        self
    }

    /// Point the speech client at another host
    pub fn speech_base_url(mut self, url: impl Into<String>) -> Self {
        self.speech_base_url = Some(url.into());
        self
    }

    /// Set speech language code
    pub fn speech_language(mut self, language: impl Into<String>) -> Self {
        self.speech_language = Some(language.into());
        self
    }

    /// Set the transcription bound
    pub fn listen_timeout(mut self, duration: Duration) -> Self {
        self.listen_timeout = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the chart output directory
    pub fn chart_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chart_dir = Some(dir.into());
        self
    }

    /// Load keys and overrides from environment at build time
    pub fn with_env_keys(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let mut config = MarketConfig {
            default_ticker: self
                .default_ticker
                .map_or(defaults.default_ticker, |t| t.trim().to_uppercase()),
            info_lookback: self.info_lookback.unwrap_or(defaults.info_lookback),
            analysis_lookback: self.analysis_lookback.unwrap_or(defaults.analysis_lookback),
            forecast_horizon_days: self
                .forecast_horizon_days
                .unwrap_or(defaults.forecast_horizon_days),
            recent_rows: self.recent_rows.unwrap_or(defaults.recent_rows),
            info_rows: self.info_rows.unwrap_or(defaults.info_rows),
            news_api_key: self.news_api_key,
            news_base_url: self.news_base_url.unwrap_or(defaults.news_base_url),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            news_rate_limit: self.news_rate_limit.unwrap_or(defaults.news_rate_limit),
            speech_api_key: self.speech_api_key,
            speech_base_url: self.speech_base_url.unwrap_or(defaults.speech_base_url),
            speech_language: self.speech_language.unwrap_or(defaults.speech_language),
            listen_timeout: self.listen_timeout.unwrap_or(defaults.listen_timeout),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            chart_dir: self.chart_dir.unwrap_or(defaults.chart_dir),
        };

        if self.from_env {
            config.apply_lookup(|name| std::env::var(name).ok());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarketConfig::default();
        assert_eq!(config.default_ticker, "RELIANCE.NS");
        assert_eq!(config.info_lookback, Lookback::OneMonth);
        assert_eq!(config.analysis_lookback, Lookback::ThreeMonths);
        assert_eq!(config.forecast_horizon_days, 5);
        assert_eq!(config.news_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = MarketConfig::builder()
            .default_ticker(" aapl ")
            .forecast_horizon_days(7)
            .request_timeout(Duration::from_secs(10))
            .news_api_key("test_key")
            .build()
            .unwrap();

        assert_eq!(config.default_ticker, "AAPL");
        assert_eq!(config.forecast_horizon_days, 7);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.news_api_key.as_deref(), Some("test_key"));
    }

    #[test]
    fn test_validation_rejects_zero_horizon() {
        let result = MarketConfig::builder().forecast_horizon_days(0).build();
        assert!(matches!(result, Err(MarketError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_huge_horizon() {
        let result = MarketConfig::builder()
            .forecast_horizon_days(100_000_000)
            .build();
        assert!(matches!(result, Err(MarketError::Config(_))));

        let config = MarketConfig::builder()
            .forecast_horizon_days(MAX_HORIZON_DAYS)
            .build()
            .unwrap();
        assert_eq!(config.forecast_horizon_days, MAX_HORIZON_DAYS);
    }

    #[test]
    fn test_builder_sets_info_rows_and_rate_limit() {
        let config = MarketConfig::builder()
            .info_rows(3)
            .news_rate_limit(10)
            .build()
            .unwrap();
        assert_eq!(config.info_rows, 3);
        assert_eq!(config.news_rate_limit, 10);

        let result = MarketConfig::builder().news_rate_limit(0).build();
        assert!(matches!(result, Err(MarketError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = MarketConfig {
            listen_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lookup_overrides() {
        let mut config = MarketConfig::default();
        config.apply_lookup(|name| match name {
            "NEWS_API_KEY" => Some("abc".to_string()),
            "SPEECH_API_KEY" => Some("   ".to_string()),
            "TRENDCAST_DEFAULT_TICKER" => Some("tcs.ns".to_string()),
            _ => None,
        });

        assert_eq!(config.news_api_key.as_deref(), Some("abc"));
        assert_eq!(config.speech_api_key, None);
        assert_eq!(config.default_ticker, "TCS.NS");
    }
}
