//! Yahoo Finance API client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::error::{MarketError, Result};
use crate::fetcher::PriceSource;
use crate::model::{Lookback, PricePoint};

/// Yahoo Finance API client
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    timeout: Duration,
}

/// Raw daily bar as returned by Yahoo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl From<Quote> for PricePoint {
    fn from(q: Quote) -> Self {
        PricePoint {
            date: q.timestamp.date_naive(),
            open: Some(q.open).filter(|v| v.is_finite()),
            high: Some(q.high).filter(|v| v.is_finite()),
            low: Some(q.low).filter(|v| v.is_finite()),
            close: q.close,
            volume: Some(q.volume),
        }
    }
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Get historical quotes for a symbol
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| MarketError::YahooFinance(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| MarketError::YahooFinance(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| MarketError::YahooFinance(format!("Invalid end timestamp: {e}")))?;

        let response = tokio::time::timeout(
            self.timeout,
            provider.get_quote_history(symbol, start_odt, end_odt),
        )
        .await
        .map_err(|_| MarketError::Timeout {
            operation: format!("Yahoo history for {symbol}"),
            seconds: self.timeout.as_secs(),
        })?
        .map_err(|e| MarketError::YahooFinance(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketError::YahooFinance(e.to_string()))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                Some(Quote {
                    symbol: symbol.to_string(),
                    timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adjclose: q.adjclose,
                })
            })
            .collect())
    }

    /// Get historical quotes covering a trailing window
    pub async fn get_historical_range(
        &self,
        symbol: &str,
        lookback: Lookback,
    ) -> Result<Vec<Quote>> {
        let end = Utc::now();
        let start = lookback.start_from(end);
        self.get_historical_quotes(symbol, start, end).await
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn history(&self, symbol: &str, lookback: Lookback) -> Result<Vec<PricePoint>> {
        let quotes = self.get_historical_range(symbol, lookback).await?;
        Ok(quotes.into_iter().map(PricePoint::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_to_price_point() {
        let quote = Quote {
            symbol: "AAPL".to_string(),
            timestamp: DateTime::from_timestamp(1_735_828_200, 0).unwrap(),
            open: 10.0,
            high: f64::NAN,
            low: 9.0,
            close: 9.5,
            volume: 1_000,
            adjclose: 9.5,
        };

        let point = PricePoint::from(quote);
        assert_eq!(point.date.to_string(), "2025-01-02");
        assert_eq!(point.open, Some(10.0));
        assert_eq!(point.high, None);
        assert_eq!(point.close, 9.5);
        assert_eq!(point.volume, Some(1_000));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_get_historical_range() {
        let client = YahooFinanceClient::new();
        let quotes = client.get_historical_range("AAPL", Lookback::OneMonth).await;
        assert!(quotes.is_ok());

        let quotes = quotes.unwrap();
        assert!(!quotes.is_empty());
        assert_eq!(quotes[0].symbol, "AAPL");
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_symbol_is_error() {
        let client = YahooFinanceClient::new();
        let result = client.history("INVALID_SYMBOL_12345", Lookback::OneMonth).await;
        assert!(result.map(|v| v.is_empty()).unwrap_or(true));
    }
}
