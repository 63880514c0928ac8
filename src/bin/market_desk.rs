//! Market desk server binary.
//!
//! Run with:
//! ```bash
//! POLYGON_API_KEY=... OPENAI_API_KEY=... market-desk --listen 0.0.0.0:8787
//! ```

use anyhow::Result;
use clap::Parser;
use market_desk::logging::init_logging;
use market_desk::{run_server, Args, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_logging();

    let args = Args::parse();
    let config = Config::from_args(args)?;

    info!("Starting market desk");
    info!("  Listen: {}", config.listen_addr);
    info!("  LLM: {} ({})", config.llm_base_url, config.llm_model);
    info!("  Market data: {}", config.market_data_base_url);
    info!("  Price guard: {}", config.price_guard);
    info!("  Upstream timeout: {:?}", config.upstream_timeout);

    run_server(config).await
}
