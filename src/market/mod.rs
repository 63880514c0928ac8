//! Client for a Polygon-compatible market-data API.

pub mod bars;
pub mod quote;

use crate::error::ApiError;
use crate::types::{BatchResult, PriceQuote};
use crate::upstream::{endpoint, UpstreamReply};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

/// Aggregates are requested in one page of at most this many bars.
pub const MAX_BARS: &str = "5000";

#[derive(Clone, Debug)]
pub struct MarketDataClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl MarketDataClient {
    pub fn new(client: Client, base_url: Url, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<UpstreamReply, ApiError> {
        let url = endpoint(&self.base_url, segments)?;
        debug!(path = url.path(), "market-data request");
        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;
        UpstreamReply::read(resp).await
    }

    /// Current market open/closed status. Best-effort: any failure is `None`.
    pub async fn market_status(&self) -> Option<Value> {
        match self.get(&["v1", "marketstatus", "now"], &[]).await {
            Ok(reply) if reply.status.is_success() => reply.body,
            Ok(reply) => {
                debug!(status = %reply.status, "market status unavailable");
                None
            }
            Err(e) => {
                debug!(error = %e, "market status request failed");
                None
            }
        }
    }

    /// Latest trade price: snapshot first, then the last-trade endpoint.
    ///
    /// `ticker` must already be normalized.
    pub async fn live_price(&self, ticker: &str) -> Result<PriceQuote, ApiError> {
        let snapshot = self
            .get(
                &[
                    "v2", "snapshot", "locale", "us", "markets", "stocks", "tickers", ticker,
                ],
                &[],
            )
            .await?;
        if snapshot.status.is_success() {
            if let Some(quote) = snapshot
                .body
                .as_ref()
                .and_then(|body| quote::quote_from_snapshot(ticker, body))
            {
                return Ok(quote);
            }
        }
        debug!(ticker, status = %snapshot.status, "no snapshot price, trying last trade");

        let last = self.get(&["v2", "last", "trade", ticker], &[]).await?;
        if last.status.is_success() {
            if let Some(quote) = last
                .body
                .as_ref()
                .and_then(|body| quote::quote_from_last_trade(ticker, body))
            {
                return Ok(quote);
            }
        }

        Err(ApiError::PriceUnavailable {
            ticker: ticker.to_string(),
            message: last.error_message(),
            market: None,
        })
    }

    /// Adjusted daily bars for `[start_date, end_date]`, ascending.
    ///
    /// Never fails: every outcome, including a network error, becomes the
    /// ticker's [`BatchResult`].
    pub async fn daily_bars(
        &self,
        ticker: String,
        start_date: &str,
        end_date: &str,
    ) -> BatchResult {
        let segments = [
            "v2",
            "aggs",
            "ticker",
            ticker.as_str(),
            "range",
            "1",
            "day",
            start_date,
            end_date,
        ];
        let query = [("adjusted", "true"), ("sort", "asc"), ("limit", MAX_BARS)];
        let reply = self.get(&segments, &query).await;

        match reply {
            Ok(reply) => bars::bars_result(ticker, reply.status, reply.body),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "daily bars request failed");
                BatchResult::failed(
                    ticker,
                    StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    None,
                    e.to_string(),
                )
            }
        }
    }
}
