use axum::Router;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use serde::Deserialize;
use std::sync::Arc;

use crate::dashboard::PageInput;
use crate::error::WebError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(dashboard))
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    ticker: Option<String>,
    notice: Option<String>,
}

/// GET / - form, tables, chart, forecast and news for one ticker.
async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, WebError> {
    let ticker = query
        .ticker
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(
            || state.pipeline.config().default_ticker.clone(),
            str::to_uppercase,
        );

    let (outcome, error) = match state.pipeline.run(&ticker).await {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => {
            tracing::warn!(ticker, error = %e, "dashboard request failed");
            (None, Some(e.to_string()))
        }
    };

    let html = state.dashboard.render(&PageInput {
        ticker: &ticker,
        notice: query.notice.as_deref(),
        error: error.as_deref(),
        outcome: outcome.as_ref(),
    })?;
    Ok(Html(html))
}
