use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use trendcast_market::{
    NO_NEWS_MESSAGE, NewsArticle, RequestOutcome, StockReport, normalize_ticker,
};

use crate::error::WebError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stocks/{ticker}", get(stock_report))
        .route("/api/stocks/{ticker}/summary", get(stock_summary))
        .route("/api/stocks/{ticker}/news", get(stock_news))
}

fn require_ticker(raw: &str) -> Result<String, WebError> {
    normalize_ticker(raw)
        .ok_or_else(|| WebError::BadRequest("ticker must not be empty".to_string()))
}

/// GET /api/stocks/{ticker} - full report, 404 when there is no data.
async fn stock_report(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<StockReport>, WebError> {
    let ticker = require_ticker(&ticker)?;
    match state.pipeline.run(&ticker).await? {
        RequestOutcome::Report(report) => Ok(Json(*report)),
        RequestOutcome::NoData { message, .. } => Err(WebError::NotFound(message)),
    }
}

/// GET /api/stocks/{ticker}/summary - last rows of the short window as text.
async fn stock_summary(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<String, WebError> {
    let ticker = require_ticker(&ticker)?;
    Ok(state.pipeline.lookup(&ticker).await)
}

#[derive(Debug, Serialize)]
struct NewsReply {
    ticker: String,
    articles: Vec<NewsArticle>,
    warning: Option<&'static str>,
}

/// GET /api/stocks/{ticker}/news - headlines, with a warning when there are none.
async fn stock_news(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> Result<Json<NewsReply>, WebError> {
    let ticker = require_ticker(&ticker)?;
    let articles = state.pipeline.news(&ticker).await;
    Ok(Json(NewsReply {
        warning: articles.is_empty().then_some(NO_NEWS_MESSAGE),
        ticker,
        articles,
    }))
}
