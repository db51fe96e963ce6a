//! Naive linear projection from the last close and its 5-day mean

use chrono::{Duration, Local, NaiveDate};

use crate::analysis::indicators::{SMA_SHORT, sma};
use crate::error::{MarketError, Result};
use crate::model::{ForecastPoint, ForecastSeries, PriceSeries};

/// Default projection length in calendar days
pub const DEFAULT_HORIZON_DAYS: usize = 5;

/// Longest projection accepted, one year of calendar days
pub const MAX_HORIZON_DAYS: usize = 365;

/// Project `horizon_days` prices starting tomorrow (local date)
pub fn forecast(series: &PriceSeries, horizon_days: usize) -> Result<ForecastSeries> {
    forecast_from(series, horizon_days, Local::now().date_naive())
}

/// Project `horizon_days` prices starting the day after `run_date`.
///
/// `predicted[i] = sma5 + i * (sma5 - last) / horizon_days` for `i` in
/// `1..=horizon_days`. This keeps extending the gap between the last close and
/// its mean; there is no mean reversion.
pub fn forecast_from(
    series: &PriceSeries,
    horizon_days: usize,
    run_date: NaiveDate,
) -> Result<ForecastSeries> {
    if horizon_days == 0 || horizon_days > MAX_HORIZON_DAYS {
        return Err(MarketError::InvalidParameter(format!(
            "forecast horizon must be between 1 and {MAX_HORIZON_DAYS} days, got {horizon_days}"
        )));
    }

    let closes = series.closes();
    let sma_5 = sma(&closes, SMA_SHORT)?
        .last()
        .copied()
        .flatten()
        .ok_or_else(|| MarketError::InsufficientData {
            indicator: format!("SMA-{SMA_SHORT}"),
            required: SMA_SHORT,
            available: closes.len(),
        })?;
    let last_close = series.last().close;

    let step = (sma_5 - last_close) / horizon_days as f64;
    let points = (1..=horizon_days)
        .map(|i| {
            let date = run_date
                .checked_add_signed(Duration::days(i as i64))
                .ok_or_else(|| {
                    MarketError::InvalidParameter(format!(
                        "forecast date {i} days after {run_date} is out of range"
                    ))
                })?;
            Ok(ForecastPoint {
                date,
                predicted_price: sma_5 + i as f64 * step,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        symbol = series.symbol(),
        last_close,
        sma_5,
        horizon_days,
        "projected forecast"
    );

    Ok(ForecastSeries {
        symbol: series.symbol().to_string(),
        generated_on: run_date,
        last_close,
        sma_5,
        horizon_days,
        points,
        speculative: true,
    })
}
