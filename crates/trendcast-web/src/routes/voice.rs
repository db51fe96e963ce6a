use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use trendcast_market::{AudioClip, VoiceOutcome};

use crate::error::WebError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/voice", post(recognize))
}

#[derive(Debug, Serialize)]
struct VoiceReply {
    #[serde(flatten)]
    outcome: VoiceOutcome,
    message: String,
}

/// POST /api/voice - transcribe a recorded clip into a ticker.
///
/// Speech failures are reported in the body, not as HTTP errors.
async fn recognize(
    State(state): State<Arc<AppState>>,
    Json(clip): Json<AudioClip>,
) -> Result<Json<VoiceReply>, WebError> {
    if clip.content_base64.trim().is_empty() {
        return Err(WebError::BadRequest("audio clip is empty".to_string()));
    }

    let outcome = state.voice.listen(&clip).await;
    Ok(Json(VoiceReply {
        message: outcome.message(),
        outcome,
    }))
}
