//! Shared handler state

use std::sync::Arc;

use trendcast_market::{GoogleSpeechClient, MarketConfig, Pipeline, VoiceCapture};

use crate::dashboard::Dashboard;
use crate::error::Result;

/// Passed to every handler through `axum::extract::State`.
///
/// Nothing in here is mutable: each request builds its own series and report.
pub struct AppState {
    pub pipeline: Pipeline,
    pub voice: VoiceCapture,
    pub dashboard: Dashboard,
}

impl AppState {
    pub fn new(pipeline: Pipeline, voice: VoiceCapture) -> Result<Arc<Self>> {
        let dashboard = Dashboard::new()?.with_listen_window(pipeline.config().listen_timeout);
        Ok(Arc::new(Self {
            pipeline,
            voice,
            dashboard,
        }))
    }

    /// Wire the production providers from configuration
    pub fn from_config(config: MarketConfig) -> Result<Arc<Self>> {
        let speech = GoogleSpeechClient::from_config(&config)?;
        let voice = VoiceCapture::new(Arc::new(speech), config.listen_timeout);
        let pipeline = Pipeline::from_config(config)?;
        Self::new(pipeline, voice)
    }
}
