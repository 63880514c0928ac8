use clap::{ArgAction, Parser};
use std::net::SocketAddr;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8787";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://api.polygon.io";
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "market-desk")]
#[command(about = "JSON proxy for an LLM chat API and a stock market-data API")]
pub struct Args {
    /// Address to listen on
    #[arg(short, long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,

    /// Key for the chat-completion provider (callers may override per request)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat-completion API
    #[arg(long, env = "LLM_BASE_URL", default_value = DEFAULT_LLM_BASE_URL)]
    pub llm_base_url: String,

    /// Model id sent with every chat request
    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_LLM_MODEL)]
    pub llm_model: String,

    /// Sampling temperature used when /ask omits one
    #[arg(long, env = "DEFAULT_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub default_temperature: f64,

    /// Reject price questions on /ask (true | false)
    #[arg(long, env = "PRICE_GUARD", default_value_t = true, action = ArgAction::Set)]
    pub price_guard: bool,

    /// Key for the market-data provider; /price and /stocks answer 401 without it
    #[arg(long, env = "POLYGON_API_KEY", hide_env_values = true)]
    pub polygon_api_key: Option<String>,

    /// Base URL of the market-data API
    #[arg(long, env = "MARKET_DATA_BASE_URL", default_value = DEFAULT_MARKET_DATA_BASE_URL)]
    pub market_data_base_url: String,

    /// Timeout for every outbound call, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,

    /// Abort upstream calls when the client disconnects (true | false)
    #[arg(long, env = "CANCEL_ON_DISCONNECT", default_value_t = true, action = ArgAction::Set)]
    pub cancel_on_disconnect: bool,
}
