//! Request and response bodies of the public HTTP API.
//!
//! Request fields are all optional at the serde level so that a missing field
//! becomes a validation error with a readable message instead of a rejection.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single chat message, usually `{role, content}`.
///
/// Kept as raw JSON and forwarded exactly as the caller sent it: `content`
/// may be null or an array of parts, and fields such as `name` or
/// `tool_calls` must survive the round trip.
pub type ChatMessage = Value;

/// POST /ask
#[derive(Deserialize, Debug, Default)]
pub struct AskRequest {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Per-request override of the server-held LLM key.
    #[serde(default, rename = "apiKey")]
    pub api_key: Option<String>,
}

/// Reply of POST /ask.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub role: String,
    pub content: String,
}

/// POST /price
#[derive(Deserialize, Debug, Default)]
pub struct PriceRequest {
    #[serde(default)]
    pub ticker: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSource {
    Snapshot,
    LastTrade,
}

/// Day and minute aggregates carried along from a snapshot hit.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SnapshotExtract {
    pub day: Option<Value>,
    pub minute: Option<Value>,
}

/// The live price of one ticker, as resolved from the market-data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub ticker: String,
    pub price: f64,
    /// Provider trade timestamp, passed through untouched.
    pub as_of: Option<Number>,
    pub source: PriceSource,
    pub snapshot: Option<SnapshotExtract>,
}

#[derive(Serialize, Debug)]
pub struct PriceMeta {
    pub source: PriceSource,
    pub market: Option<Value>,
    pub snapshot: Option<SnapshotExtract>,
}

/// Reply of POST /price.
#[derive(Serialize, Debug)]
pub struct PriceResponse {
    pub ok: bool,
    pub ticker: String,
    pub price: f64,
    #[serde(rename = "asOf")]
    pub as_of: Option<Number>,
    pub meta: PriceMeta,
}

impl PriceResponse {
    pub fn new(quote: PriceQuote, market: Option<Value>) -> Self {
        Self {
            ok: true,
            ticker: quote.ticker,
            price: quote.price,
            as_of: quote.as_of,
            meta: PriceMeta {
                source: quote.source,
                market,
                snapshot: quote.snapshot,
            },
        }
    }
}

/// POST /stocks
#[derive(Deserialize, Debug, Default)]
pub struct StocksRequest {
    #[serde(default)]
    pub tickers: Option<Vec<String>>,
    #[serde(default, rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, rename = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CloseMeta {
    #[serde(rename = "latestClose")]
    pub latest_close: Option<Value>,
    #[serde(rename = "latestCloseTime")]
    pub latest_close_time: Option<Value>,
}

/// Outcome of the daily-bar query for one ticker.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub ticker: String,
    pub ok: bool,
    pub status: u16,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub meta: CloseMeta,
}

impl BatchResult {
    pub fn failed(ticker: String, status: u16, data: Option<Value>, error: String) -> Self {
        Self {
            ticker,
            ok: false,
            status,
            data,
            error: Some(error),
            meta: CloseMeta::default(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TickerError {
    pub ticker: String,
    pub error: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RangeMeta {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

/// Reply of POST /stocks, for both the 200 and the 502 case.
#[derive(Serialize, Debug)]
pub struct BatchEnvelope {
    pub ok: bool,
    pub results: Vec<BatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<RangeMeta>,
    pub errors: Vec<TickerError>,
}

/// Body returned for every unrouted request.
#[derive(Serialize, Debug)]
pub struct ServiceInfo {
    pub message: &'static str,
}
