//! Tabular views of a series

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{IndicatorSet, PriceSeries};

/// One row of the recent-data table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<u64>,
    pub sma_20: Option<f64>,
    pub sma_5: Option<f64>,
    pub rsi_14: Option<f64>,
}

/// Last `n` rows of `series`, joined with their indicator values
pub fn recent_rows(series: &PriceSeries, indicators: &IndicatorSet, n: usize) -> Vec<RecentRow> {
    series
        .tail(n)
        .iter()
        .zip(indicators.tail(n))
        .map(|(p, ind)| RecentRow {
            date: p.date,
            open: p.open,
            high: p.high,
            low: p.low,
            close: p.close,
            volume: p.volume,
            sma_20: ind.sma_20,
            sma_5: ind.sma_5,
            rsi_14: ind.rsi_14,
        })
        .collect()
}

/// Format an optional price cell
pub fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Plain-text table of the last `n` bars
pub fn summary_text(series: &PriceSeries, n: usize) -> String {
    let mut out = format!(
        "{:<10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>12}\n",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for p in series.tail(n) {
        out.push_str(&format!(
            "{:<10}  {:>10}  {:>10}  {:>10}  {:>10.2}  {:>12}\n",
            p.date.format("%Y-%m-%d").to_string(),
            cell(p.open),
            cell(p.high),
            cell(p.low),
            p.close,
            p.volume.map_or_else(|| "-".to_string(), |v| v.to_string()),
        ));
    }
    out
}

/// Message shown when a ticker has no data
pub fn invalid_ticker_message(ticker: &str) -> String {
    format!("Invalid ticker: {ticker}. Please enter a valid stock symbol.")
}
