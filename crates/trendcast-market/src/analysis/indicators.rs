//! Rolling indicators over a price series
//!
//! Every function here is pure: it reads closes and returns a new vector aligned
//! index for index with its input. Warm-up positions are `None`.

use ta::{Next, indicators::SimpleMovingAverage};

use crate::error::Result;
use crate::model::{IndicatorRow, IndicatorSet, PriceSeries};

/// Trend reference window
pub const SMA_LONG: usize = 20;
/// Forecast basis window
pub const SMA_SHORT: usize = 5;
/// RSI lookback in deltas
pub const RSI_PERIOD: usize = 14;

/// Simple moving average of `values` over `window`.
///
/// Position `i` holds the mean of `values[i + 1 - window..=i]` once
/// `i >= window - 1`, and `None` before that.
pub fn sma(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut avg = SimpleMovingAverage::new(window)?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let mean = avg.next(v);
            (i + 1 >= window).then_some(mean)
        })
        .collect())
}

/// Relative strength index using simple (not Wilder) means of gains and losses.
///
/// The first close has no delta, so values start at index `period`. A window
/// without any loss reports exactly 100, including a flat window.
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut gains = SimpleMovingAverage::new(period)?;
    let mut losses = SimpleMovingAverage::new(period)?;

    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return Ok(out);
    }
    out.push(None);

    for (n, pair) in closes.windows(2).enumerate() {
        let delta = pair[1] - pair[0];
        let mean_gain = gains.next(delta.max(0.0));
        let mean_loss = losses.next((-delta).max(0.0));

        // n counts deltas seen so far minus one
        if n + 1 < period {
            out.push(None);
            continue;
        }

        out.push(Some(relative_strength(mean_gain, mean_loss)));
    }

    Ok(out)
}

fn relative_strength(mean_gain: f64, mean_loss: f64) -> f64 {
    // running sums can leave tiny residue once a loss leaves the window
    if mean_loss <= f64::EPSILON * mean_gain.abs().max(1.0) {
        return 100.0;
    }
    let rs = mean_gain.max(0.0) / mean_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Compute SMA-20, SMA-5 and RSI-14 for every point of `series`
pub fn analyze(series: &PriceSeries) -> Result<IndicatorSet> {
    let closes = series.closes();

    let sma_20 = sma(&closes, SMA_LONG)?;
    let sma_5 = sma(&closes, SMA_SHORT)?;
    let rsi_14 = rsi(&closes, RSI_PERIOD)?;

    let rows = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| IndicatorRow {
            date: p.date,
            sma_20: sma_20[i],
            sma_5: sma_5[i],
            rsi_14: rsi_14[i],
        })
        .collect();

    tracing::debug!(
        symbol = series.symbol(),
        points = series.len(),
        "computed indicators"
    );

    Ok(IndicatorSet { rows })
}

/// Interpret RSI value
pub fn interpret_rsi(rsi: f64) -> &'static str {
    if rsi > 70.0 {
        "Overbought"
    } else if rsi < 30.0 {
        "Oversold"
    } else {
        "Neutral"
    }
}
