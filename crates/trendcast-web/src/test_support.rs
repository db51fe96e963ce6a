//! In-process app wired to canned providers

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tokio::net::TcpListener;

use trendcast_market::{
    AudioClip, Lookback, MarketConfig, MarketError, NewsArticle, NewsSource, Pipeline, PricePoint,
    PriceSource, SpeechRecognizer, TranscriptionFailure, VoiceCapture,
};

use crate::state::AppState;

/// Knows exactly one ticker, AAPL
struct CannedPrices;

#[async_trait]
impl PriceSource for CannedPrices {
    async fn history(
        &self,
        symbol: &str,
        _lookback: Lookback,
    ) -> trendcast_market::Result<Vec<PricePoint>> {
        if symbol != "AAPL" {
            return Err(MarketError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Ok((0..60)
            .map(|i| PricePoint::close_only(start + Duration::days(i), 150.0 + (i % 7) as f64))
            .collect())
    }
}

struct CannedNews {
    enabled: bool,
}

#[async_trait]
impl NewsSource for CannedNews {
    async fn headlines(&self, _query: &str, limit: usize) -> Vec<NewsArticle> {
        if !self.enabled {
            return Vec::new();
        }
        (1..=2)
            .take(limit)
            .map(|i| NewsArticle {
                title: format!("Headline {i}"),
                url: format!("https://news.example/{i}"),
                source: Some("Example Wire".to_string()),
                published_at: None,
            })
            .collect()
    }
}

struct CannedSpeech {
    transcript: String,
}

#[async_trait]
impl SpeechRecognizer for CannedSpeech {
    async fn recognize(&self, _clip: &AudioClip) -> Result<String, TranscriptionFailure> {
        if self.transcript.is_empty() {
            Err(TranscriptionFailure::Unintelligible)
        } else {
            Ok(self.transcript.clone())
        }
    }
}

pub fn state(transcript: &str, news: bool) -> Arc<AppState> {
    let config = MarketConfig::builder().default_ticker("AAPL").build().unwrap();
    let listen = config.listen_timeout;
    let pipeline = Pipeline::new(
        Arc::new(config),
        Arc::new(CannedPrices),
        Arc::new(CannedNews { enabled: news }),
    );
    let voice = VoiceCapture::new(
        Arc::new(CannedSpeech {
            transcript: transcript.to_string(),
        }),
        listen,
    );
    AppState::new(pipeline, voice).unwrap()
}

/// Serve the app on an ephemeral port and return its base URL
pub async fn spawn_app_with(transcript: &str, news: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = crate::router(state(transcript, news));
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{addr}")
}

pub async fn spawn_app() -> String {
    spawn_app_with("apple", true).await
}
