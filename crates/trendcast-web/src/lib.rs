//! Web dashboard and JSON API for trendcast
//!
//! The router is built over a shared, read-only [`AppState`]; every request
//! runs its own fetch → analyze → forecast pass.
//!
//! ```rust,ignore
//! use trendcast_market::MarketConfig;
//! use trendcast_web::{AppState, WebConfig};
//!
//! let state = AppState::from_config(MarketConfig::builder().with_env_keys().build()?)?;
//! trendcast_web::serve(&WebConfig::from_env()?, state).await?;
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::WebConfig;
pub use dashboard::{Dashboard, PageInput};
pub use error::{Result, WebError};
pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `config.addr()` and serve until Ctrl+C.
pub async fn serve(config: &WebConfig, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(config.addr()).await?;
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `signal` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("trendcast dashboard listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(signal)
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received, gracefully stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_app, spawn_app_with};
    use serde_json::Value;

    #[tokio::test]
    async fn test_health() {
        let base = spawn_app().await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_dashboard_renders_default_ticker() {
        let base = spawn_app().await;
        let response = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(response.status(), 200);

        let html = response.text().await.unwrap();
        assert!(html.contains(r#"value="AAPL""#));
        assert!(html.contains("AAPL Stock Price Trend"));
        assert!(html.contains("Price forecast (next 5 days)"));
        assert!(html.contains("Headline 1"));
    }

    #[tokio::test]
    async fn test_dashboard_unknown_ticker() {
        let base = spawn_app().await;
        let html = reqwest::get(format!("{base}/?ticker=nope"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert!(html.contains(trendcast_market::NO_DATA_MESSAGE));
        assert!(!html.contains("<polyline"));
    }

    #[tokio::test]
    async fn test_report_api() {
        let base = spawn_app().await;
        let body: Value = reqwest::get(format!("{base}/api/stocks/aapl"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["ticker"], "AAPL");
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["recent"].as_array().unwrap().len(), 10);
        assert_eq!(body["forecast"]["points"].as_array().unwrap().len(), 5);
        assert_eq!(body["news"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_report_api_not_found() {
        let base = spawn_app().await;
        let response = reqwest::get(format!("{base}/api/stocks/NOPE")).await.unwrap();
        assert_eq!(response.status(), 404);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], trendcast_market::NO_DATA_MESSAGE);
    }

    #[tokio::test]
    async fn test_summary_api() {
        let base = spawn_app().await;
        let text = reqwest::get(format!("{base}/api/stocks/NOPE/summary"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(text, "Invalid ticker: NOPE. Please enter a valid stock symbol.");
    }

    #[tokio::test]
    async fn test_news_api_warning() {
        let base = spawn_app_with("apple dot ns", false).await;
        let body: Value = reqwest::get(format!("{base}/api/stocks/AAPL/news"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(body["articles"].as_array().unwrap().is_empty());
        assert_eq!(body["warning"], trendcast_market::NO_NEWS_MESSAGE);
    }

    #[tokio::test]
    async fn test_voice_api() {
        let base = spawn_app_with("reliance dot ns", true).await;
        let body: Value = reqwest::Client::new()
            .post(format!("{base}/api/voice"))
            .json(&serde_json::json!({ "content_base64": "AAAA" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "recognized");
        assert_eq!(body["ticker"], "RELIANCE.NS");
        assert_eq!(body["message"], "You said: reliance dot ns");
    }

    #[tokio::test]
    async fn test_voice_api_unintelligible() {
        let base = spawn_app_with("", true).await;
        let body: Value = reqwest::Client::new()
            .post(format!("{base}/api/voice"))
            .json(&serde_json::json!({ "content_base64": "AAAA" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "unintelligible");
        assert_eq!(body["message"], "Could not understand speech");
    }

    #[tokio::test]
    async fn test_voice_api_rejects_empty_clip() {
        let base = spawn_app().await;
        let response = reqwest::Client::new()
            .post(format!("{base}/api/voice"))
            .json(&serde_json::json!({ "content_base64": "" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_graceful_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve_with_shutdown(
            listener,
            crate::test_support::state("x", true),
            async move {
                let _ = rx.await;
            },
        ));

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
