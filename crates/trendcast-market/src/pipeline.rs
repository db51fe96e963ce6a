//! Fetch → analyze → forecast, plus the independent news lookup
//!
//! A [`Pipeline`] is stateless between requests: each call builds its series,
//! derives indicators and forecast, and hands back an owned report.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::{analyze, forecast_from, interpret_rsi};
use crate::api::{NewsApiClient, YahooFinanceClient};
use crate::api::news::{NewsArticle, NewsSource};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::fetcher::{Fetcher, PriceSource, normalize_ticker};
use crate::model::{ForecastSeries, IndicatorSet};
use crate::report::{RecentRow, TrendChart, invalid_ticker_message, recent_rows, summary_text};

/// Shown when the price fetch comes back empty
pub const NO_DATA_MESSAGE: &str = "Invalid ticker symbol or no data available.";

/// Shown when the news lookup comes back empty
pub const NO_NEWS_MESSAGE: &str = "No news articles found.";

/// Everything a surface needs to render one ticker
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    pub ticker: String,
    pub currency: String,
    pub recent: Vec<RecentRow>,
    pub indicators: IndicatorSet,
    pub latest_rsi: Option<f64>,
    pub rsi_signal: Option<&'static str>,
    pub chart: TrendChart,
    pub forecast: Option<ForecastSeries>,
    pub forecast_note: Option<String>,
    pub news: Vec<NewsArticle>,
    pub news_warning: Option<String>,
}

/// Result of one dashboard request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Nothing to show; chart, forecast and news are suppressed
    NoData { ticker: String, message: String },
    Report(Box<StockReport>),
}

impl RequestOutcome {
    pub fn report(&self) -> Option<&StockReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::NoData { .. } => None,
        }
    }
}

/// Composes the fetcher, analyzer, forecaster and news lookup
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<MarketConfig>,
    fetcher: Fetcher,
    news: Arc<dyn NewsSource>,
}

impl Pipeline {
    pub fn new(
        config: Arc<MarketConfig>,
        prices: Arc<dyn PriceSource>,
        news: Arc<dyn NewsSource>,
    ) -> Self {
        Self {
            config,
            fetcher: Fetcher::new(prices),
            news,
        }
    }

    /// Wire up Yahoo Finance and NewsAPI from configuration
    pub fn from_config(config: MarketConfig) -> Result<Self> {
        config.validate()?;
        let prices = Arc::new(YahooFinanceClient::with_timeout(config.request_timeout));
        let news = Arc::new(NewsApiClient::from_config(&config)?);
        Ok(Self::new(Arc::new(config), prices, news))
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Short text summary of the last few bars over the informational window
    pub async fn lookup(&self, ticker: &str) -> String {
        let display = normalize_ticker(ticker).unwrap_or_default();
        match self.fetcher.fetch(ticker, self.config.info_lookback).await {
            Some(series) => summary_text(&series, self.config.info_rows),
            None => invalid_ticker_message(&display),
        }
    }

    /// Headlines for `ticker`, capped at the configured limit
    pub async fn news(&self, ticker: &str) -> Vec<NewsArticle> {
        match normalize_ticker(ticker) {
            Some(symbol) => self.news.headlines(&symbol, self.config.news_limit).await,
            None => Vec::new(),
        }
    }

    /// Run the full request with forecasts dated from today
    pub async fn run(&self, ticker: &str) -> Result<RequestOutcome> {
        self.run_on(ticker, Local::now().date_naive()).await
    }

    /// Run the full request with forecasts dated from `run_date`
    pub async fn run_on(&self, ticker: &str, run_date: NaiveDate) -> Result<RequestOutcome> {
        let display_ticker = normalize_ticker(ticker).unwrap_or_default();
        tracing::info!(ticker = %display_ticker, "handling stock request");

        let (series, news) = tokio::join!(
            self.fetcher.fetch(ticker, self.config.analysis_lookback),
            self.news(ticker),
        );

        let Some(series) = series else {
            return Ok(RequestOutcome::NoData {
                ticker: display_ticker,
                message: NO_DATA_MESSAGE.to_string(),
            });
        };

        let indicators = analyze(&series)?;
        let chart = TrendChart::build(&series, &indicators);
        let latest_rsi = indicators.latest_rsi();

        let (forecast, forecast_note) =
            match forecast_from(&series, self.config.forecast_horizon_days, run_date) {
                Ok(f) => (Some(f), None),
                Err(MarketError::InsufficientData {
                    required,
                    available,
                    ..
                }) => (
                    None,
                    Some(format!(
                        "Forecast needs at least {required} trading days of data; \
                         only {available} available."
                    )),
                ),
                Err(e) => return Err(e),
            };

        let news_warning = news.is_empty().then(|| NO_NEWS_MESSAGE.to_string());

        Ok(RequestOutcome::Report(Box::new(StockReport {
            ticker: series.symbol().to_string(),
            currency: chart.currency.clone(),
            recent: recent_rows(&series, &indicators, self.config.recent_rows),
            latest_rsi,
            rsi_signal: latest_rsi.map(interpret_rsi),
            indicators,
            chart,
            forecast,
            forecast_note,
            news,
            news_warning,
        })))
    }

    /// Fetch, analyze and write the PNG chart artifact; `None` when there is no data
    pub async fn write_chart(&self, ticker: &str) -> Result<Option<PathBuf>> {
        let Some(series) = self
            .fetcher
            .fetch(ticker, self.config.analysis_lookback)
            .await
        else {
            return Ok(None);
        };

        let indicators = analyze(&series)?;
        let path = TrendChart::build(&series, &indicators).write_png(&self.config.chart_dir)?;
        Ok(Some(path))
    }
}
