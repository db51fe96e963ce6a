pub mod pages;
pub mod stocks;
pub mod voice;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::state::AppState;

/// Assemble the page and API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(pages::routes())
        .merge(stocks::routes())
        .merge(voice::routes())
        .route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
