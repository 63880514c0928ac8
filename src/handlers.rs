//! HTTP request handlers.

use crate::app::AppState;
use crate::config::Config;
use crate::error::ApiError;
use crate::guard::looks_like_price_question;
use crate::market::bars;
use crate::types::{
    AskRequest, BatchEnvelope, ChatReply, PriceRequest, PriceResponse, ServiceInfo,
    StocksRequest,
};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, error, warn};

const ASK_REQUIRED: &str = "messages[] required";
const PRICE_REQUIRED: &str = "ticker required";
const STOCKS_REQUIRED: &str = "tickers[], startDate, and endDate are required";

pub const SERVICE_MESSAGE: &str = "Market desk API is running!";

/// Parse a request body in two steps.
///
/// A body that is not JSON at all is an internal error; JSON of the wrong
/// shape is reported with the endpoint's `required` message.
fn parse_body<T: DeserializeOwned>(body: &Bytes, required: &str) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)?;
    T::deserialize(value).map_err(|e| {
        debug!(error = %e, "request body has the wrong shape");
        ApiError::Validation(required.into())
    })
}

/// Trimmed and uppercased.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Await upstream work, detaching it from the connection when configured to.
///
/// Dropping a handler future (client hung up) cancels everything it awaits;
/// a spawned task runs to completion regardless.
async fn run_upstream<T, F>(config: &Config, work: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Send + 'static,
{
    if config.cancel_on_disconnect {
        return work.await;
    }
    tokio::spawn(work)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// POST /ask - Forward a conversation to the chat-completion provider.
pub async fn ask(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let req: AskRequest = parse_body(&body, ASK_REQUIRED)?;
    let messages = req
        .messages
        .ok_or_else(|| ApiError::Validation(ASK_REQUIRED.into()))?;

    if state.config.price_guard && looks_like_price_question(&messages) {
        debug!(history_len = messages.len(), "price question kept away from the LLM");
        return Err(ApiError::DomainGuard);
    }

    let api_key = non_empty(req.api_key)
        .or_else(|| state.config.llm_api_key.clone())
        .ok_or_else(|| ApiError::missing_key("OPENAI_API_KEY"))?;
    let temperature = req.temperature.unwrap_or(state.config.default_temperature);

    let llm = state.llm.clone();
    let reply = run_upstream(&state.config, async move {
        llm.complete(&api_key, &messages, temperature).await
    })
    .await
    .inspect_err(|e| warn!(error = %e, "chat request failed"))?;

    Ok(Json(reply))
}

/// POST /price - Live price of one ticker plus market status.
pub async fn price(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PriceResponse>, ApiError> {
    let req: PriceRequest = parse_body(&body, PRICE_REQUIRED)?;
    let ticker = req
        .ticker
        .map(|t| normalize_ticker(&t))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation(PRICE_REQUIRED.into()))?;
    let market = state.market()?.clone();

    let response = run_upstream(&state.config, async move {
        let (market_status, live) =
            tokio::join!(market.market_status(), market.live_price(&ticker));
        let quote = match live {
            Ok(quote) => quote,
            Err(ApiError::PriceUnavailable {
                ticker, message, ..
            }) => {
                warn!(ticker = %ticker, error = %message, "no live price");
                return Err(ApiError::PriceUnavailable {
                    ticker,
                    message,
                    market: market_status,
                });
            }
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "live price lookup failed");
                return Err(e);
            }
        };
        debug!(ticker = %ticker, price = quote.price, source = ?quote.source, "live price");
        Ok::<_, ApiError>(PriceResponse::new(quote, market_status))
    })
    .await?;

    Ok(Json(response))
}

/// POST /stocks - Daily bars for several tickers, fetched in parallel.
pub async fn stocks(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<BatchEnvelope>), ApiError> {
    let req: StocksRequest = parse_body(&body, STOCKS_REQUIRED)?;
    let required = || ApiError::Validation(STOCKS_REQUIRED.into());
    let tickers = req.tickers.filter(|t| !t.is_empty()).ok_or_else(required)?;
    let start_date = non_empty(req.start_date).ok_or_else(required)?;
    let end_date = non_empty(req.end_date).ok_or_else(required)?;
    let market = state.market()?.clone();

    let (status, envelope) = run_upstream(&state.config, async move {
        let fetches = tickers
            .iter()
            .map(|t| market.daily_bars(normalize_ticker(t), &start_date, &end_date));
        let results = join_all(fetches).await;

        for r in &results {
            if r.ok {
                debug!(ticker = %r.ticker, latest_close = ?r.meta.latest_close, "ticker ok");
            } else {
                warn!(ticker = %r.ticker, error = ?r.error, "ticker failed");
            }
        }

        let (status, envelope) = bars::summarize(results, start_date, end_date);
        if !envelope.ok {
            error!(tickers = envelope.results.len(), "all tickers failed");
        }
        Ok::<_, ApiError>((status, envelope))
    })
    .await?;

    Ok((status, Json(envelope)))
}

/// Anything unrouted gets a short liveness message.
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: SERVICE_MESSAGE,
    })
}
