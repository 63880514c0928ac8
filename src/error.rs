//! Error taxonomy for the HTTP handlers.
//!
//! Every handler returns `Result<_, ApiError>`; the error is rendered as
//! `{"ok": false, "error": "..."}` with the status code of its variant.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing request fields.
    #[error("{0}")]
    Validation(String),

    /// A server-side credential is not configured.
    #[error("{0}")]
    Config(String),

    /// The chat request looks like a market-data question.
    #[error("Use /price (for live) or /stocks (for history) for market data.")]
    DomainGuard,

    /// Neither price source had a trade for the ticker.
    ///
    /// Rendered with the ticker and whatever market status was fetched
    /// alongside the failed lookup.
    #[error("{message}")]
    PriceUnavailable {
        ticker: String,
        message: String,
        market: Option<Value>,
    },

    /// The upstream answered with a non-success status.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// Network failures, unparsable bodies and everything else.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_key(var: &str) -> Self {
        Self::Config(format!("Missing {var}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DomainGuard => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::UNAUTHORIZED,
            Self::PriceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::PriceUnavailable {
                ticker,
                message,
                market,
            } => json!({
                "ok": false,
                "error": message,
                "ticker": ticker,
                "meta": { "market": market },
            }),
            other => json!({ "ok": false, "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}
