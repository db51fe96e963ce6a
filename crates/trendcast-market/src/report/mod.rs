//! Report assembly for rendering surfaces

pub mod chart;
pub mod table;

pub use chart::{TrendChart, artifact_name, currency_for};
pub use table::{RecentRow, invalid_ticker_message, recent_rows, summary_text};
