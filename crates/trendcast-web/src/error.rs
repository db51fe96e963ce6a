//! Error type for dashboard and API responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use trendcast_market::MarketError;

pub type Result<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("invalid {name}: {value}")]
    Config { name: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Market(MarketError::InvalidParameter(_)) => StatusCode::BAD_REQUEST,
            Self::Market(
                MarketError::Transport(_)
                | MarketError::ApiError(_)
                | MarketError::YahooFinance(_),
            ) => StatusCode::BAD_GATEWAY,
            Self::Market(MarketError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, axum::Json(json!({ "error": self.to_string() }))).into_response()
    }
}
