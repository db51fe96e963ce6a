//! Indicator computation and forecasting

pub mod forecast;
pub mod indicators;

pub use forecast::{DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS, forecast, forecast_from};
pub use indicators::{RSI_PERIOD, SMA_LONG, SMA_SHORT, analyze, interpret_rsi, rsi, sma};
