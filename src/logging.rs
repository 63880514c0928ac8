use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_logging() {
    // RUST_LOG wins; otherwise debug for this crate and info for the rest
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_desk=debug,tower_http=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
