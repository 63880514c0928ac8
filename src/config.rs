//! Server configuration.

use crate::args::Args;
use anyhow::{Context, Result};
use reqwest::Url;
use std::net::SocketAddr;
use std::time::Duration;

/// Everything the handlers need to know, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Server-held LLM key; callers may override it per request.
    pub llm_api_key: Option<String>,
    pub llm_base_url: Url,
    pub llm_model: String,
    pub default_temperature: f64,
    /// Reject price questions on /ask before they reach the LLM.
    pub price_guard: bool,
    pub market_data_api_key: Option<String>,
    pub market_data_base_url: Url,
    pub upstream_timeout: Duration,
    /// When false, upstream work keeps running after the client hangs up.
    pub cancel_on_disconnect: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let llm_base_url = Url::parse(&args.llm_base_url)
            .with_context(|| format!("invalid LLM_BASE_URL '{}'", args.llm_base_url))?;
        let market_data_base_url = Url::parse(&args.market_data_base_url).with_context(|| {
            format!(
                "invalid MARKET_DATA_BASE_URL '{}'",
                args.market_data_base_url
            )
        })?;

        Ok(Self {
            listen_addr: args.listen,
            llm_api_key: non_empty(args.openai_api_key),
            llm_base_url,
            llm_model: args.llm_model,
            default_temperature: args.default_temperature,
            price_guard: args.price_guard,
            market_data_api_key: non_empty(args.polygon_api_key),
            market_data_base_url,
            upstream_timeout: Duration::from_secs(args.upstream_timeout_secs),
            cancel_on_disconnect: args.cancel_on_disconnect,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["market-desk"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn blank_keys_are_treated_as_missing() {
        let args = parse(&["--openai-api-key", "  ", "--polygon-api-key", "pk"]);
        let config = Config::from_args(args).unwrap();
        assert!(config.llm_api_key.is_none());
        assert_eq!(config.market_data_api_key.as_deref(), Some("pk"));
    }

    #[test]
    fn rejects_malformed_base_url() {
        let args = parse(&["--llm-base-url", "not a url"]);
        assert!(Config::from_args(args).is_err());
    }

    #[test]
    fn timeout_is_taken_in_seconds() {
        let args = parse(&["--upstream-timeout-secs", "7"]);
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.upstream_timeout, Duration::from_secs(7));
    }
}
