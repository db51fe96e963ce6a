//! API clients for market data, news and speech providers

pub mod news;
pub mod speech;
pub mod yahoo;

pub use news::{NewsApiClient, NewsArticle, NewsSource};
pub use speech::GoogleSpeechClient;
pub use yahoo::{Quote, YahooFinanceClient};
