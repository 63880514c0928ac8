//! HTTP front for an LLM chat API and a stock market-data API.
//!
//! ## Endpoints
//!
//! | Method | Path      | Behaviour                                         |
//! |--------|-----------|---------------------------------------------------|
//! | POST   | `/ask`    | Forward a conversation to the chat provider       |
//! | POST   | `/price`  | Live price of one ticker plus market status       |
//! | POST   | `/stocks` | Daily bars for several tickers, fetched in parallel |
//! | OPTIONS| any       | CORS headers, empty body                          |
//! | any    | other     | Short informational message                       |
//!
//! Errors are always `{"ok": false, "error": "..."}`.

pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod llm;
pub mod logging;
pub mod market;
pub mod middleware;
pub mod types;
pub mod upstream;

pub use app::{router, run_server, AppState};
pub use args::Args;
pub use config::Config;
pub use error::ApiError;
