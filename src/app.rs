//! Router assembly and the server loop.

use crate::config::Config;
use crate::error::ApiError;
use crate::handlers;
use crate::llm::LlmClient;
use crate::market::MarketDataClient;
use crate::middleware::cors_and_cache;
use crate::upstream::build_client;
use anyhow::{Context, Result};
use axum::middleware::from_fn;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: LlmClient,
    /// Absent when no market-data key is configured.
    pub market: Option<MarketDataClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = build_client(config.upstream_timeout)?;
        let llm = LlmClient::new(
            client.clone(),
            config.llm_base_url.clone(),
            config.llm_model.clone(),
        );
        let market = config.market_data_api_key.clone().map(|key| {
            MarketDataClient::new(client.clone(), config.market_data_base_url.clone(), key)
        });

        Ok(Self {
            config: Arc::new(config),
            llm,
            market,
        })
    }

    /// The market-data client, or 401 if the server has no key for it.
    pub fn market(&self) -> Result<&MarketDataClient, ApiError> {
        self.market
            .as_ref()
            .ok_or_else(|| ApiError::missing_key("POLYGON_API_KEY"))
    }
}

/// Build the full router: three POST endpoints, an informational fallback for
/// every other path or method, CORS and no-store headers on all responses.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/ask",
            post(handlers::ask).fallback(handlers::service_info),
        )
        .route(
            "/price",
            post(handlers::price).fallback(handlers::service_info),
        )
        .route(
            "/stocks",
            post(handlers::stocks).fallback(handlers::service_info),
        )
        .fallback(handlers::service_info)
        .with_state(state)
        .layer(from_fn(cors_and_cache))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: Config) -> Result<()> {
    let listen_addr = config.listen_addr;

    if config.market_data_api_key.is_none() {
        warn!("POLYGON_API_KEY not set; /price and /stocks will answer 401");
    }
    if config.llm_api_key.is_none() {
        warn!("OPENAI_API_KEY not set; /ask requires a per-request apiKey");
    }

    let app = router(AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;

    info!("Listening on http://{}", listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
