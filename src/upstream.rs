//! Helpers shared by the LLM and market-data clients.

use crate::error::ApiError;
use anyhow::Context;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Build the HTTP client shared by all upstream calls.
///
/// One client means one connection pool; the timeout applies to each call.
pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("market-desk/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build upstream HTTP client")
}

/// Append path segments to `base`, percent-encoding each one.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Internal(format!("base URL '{base}' cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Status plus the body parsed as JSON, if it was JSON at all.
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl UpstreamReply {
    pub async fn read(resp: reqwest::Response) -> Result<Self, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        Ok(Self {
            status,
            body: serde_json::from_slice(&bytes).ok(),
        })
    }

    /// The provider's error text, or `HTTP {status}` when it gave none.
    pub fn error_message(&self) -> String {
        error_message(self.body.as_ref(), self.status)
    }
}

/// Pull a human-readable error out of an upstream body.
///
/// Understands `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`.
pub fn error_message(body: Option<&Value>, status: StatusCode) -> String {
    let from_body = body.and_then(|b| {
        let error = b.get("error");
        error
            .and_then(Value::as_str)
            .or_else(|| error.and_then(|e| e.get("message")).and_then(Value::as_str))
            .or_else(|| b.get("message").and_then(Value::as_str))
    });

    match from_body {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => format!("HTTP {}", status.as_u16()),
    }
}
