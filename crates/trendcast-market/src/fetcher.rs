//! Price history retrieval
//!
//! Failures stop here: [`Fetcher::fetch`] turns every upstream problem into
//! `None` so callers only ever check for absence.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Lookback, PricePoint, PriceSeries};

/// Upstream provider of daily bars
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Daily bars for `symbol` covering `lookback`, in any order
    async fn history(&self, symbol: &str, lookback: Lookback) -> Result<Vec<PricePoint>>;
}

/// Normalize user input into a ticker: trimmed and upper-cased
pub fn normalize_ticker(input: &str) -> Option<String> {
    let ticker = input.trim().to_uppercase();
    (!ticker.is_empty()).then_some(ticker)
}

/// Single-attempt price fetcher
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn PriceSource>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// Fetch `lookback` of history for `ticker`, or `None` when there is nothing to show
    pub async fn fetch(&self, ticker: &str, lookback: Lookback) -> Option<PriceSeries> {
        let Some(symbol) = normalize_ticker(ticker) else {
            tracing::warn!("empty ticker, skipping fetch");
            return None;
        };

        let points = match self.source.history(&symbol, lookback).await {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!(symbol, %lookback, error = %e, "price fetch failed");
                return None;
            }
        };

        match PriceSeries::new(symbol.clone(), points) {
            Ok(series) => {
                tracing::info!(
                    symbol,
                    %lookback,
                    points = series.len(),
                    from = %series.first_date(),
                    to = %series.last_date(),
                    "fetched price history"
                );
                Some(series)
            }
            Err(e) => {
                tracing::warn!(symbol, %lookback, error = %e, "provider returned no usable rows");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use chrono::NaiveDate;
    use mockall::predicate::{eq, function};

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint::close_only(NaiveDate::from_ymd_opt(2025, 2, day).unwrap(), close)
    }

    #[tokio::test]
    async fn test_fetch_returns_sorted_series() {
        let mut source = MockPriceSource::new();
        source
            .expect_history()
            .with(function(|s: &str| s == "AAPL"), eq(Lookback::ThreeMonths))
            .times(1)
            .returning(|_, _| Ok(vec![point(4, 11.0), point(3, 10.0)]));

        let fetcher = Fetcher::new(Arc::new(source));
        let series = fetcher.fetch(" aapl ", Lookback::ThreeMonths).await.unwrap();

        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_none() {
        let mut source = MockPriceSource::new();
        source.expect_history().times(1).returning(|symbol, _| {
            Err(MarketError::YahooFinance(format!("No data found for {symbol}")))
        });

        let fetcher = Fetcher::new(Arc::new(source));
        assert!(fetcher.fetch("NOTATICKER", Lookback::OneMonth).await.is_none());
    }

    #[tokio::test]
    async fn test_empty_upstream_is_none() {
        let mut source = MockPriceSource::new();
        source.expect_history().times(1).returning(|_, _| Ok(vec![]));

        let fetcher = Fetcher::new(Arc::new(source));
        assert!(fetcher.fetch("AAPL", Lookback::OneMonth).await.is_none());
    }

    #[tokio::test]
    async fn test_blank_ticker_skips_network() {
        let mut source = MockPriceSource::new();
        source.expect_history().never();

        let fetcher = Fetcher::new(Arc::new(source));
        assert!(fetcher.fetch("   ", Lookback::OneMonth).await.is_none());
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" reliance.ns ").as_deref(), Some("RELIANCE.NS"));
        assert_eq!(normalize_ticker(""), None);
    }
}
