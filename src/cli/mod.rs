use clap::Parser;
use std::time::Duration;

use crate::config::persona::MODEL_ID;
use crate::llm::LlmConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Assistant Upstream Args ---
    /// Gemini API key. When unset the assistant answers every question with a setup notice.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Gemini API (e.g., https://generativelanguage.googleapis.com)
    #[arg(long, env = "GEMINI_BASE_URL")] // No default, let the client handle it if None
    pub base_url: Option<String>,

    /// Seconds to wait for one upstream reply before giving up.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- Server Args ---
    /// Host address and port for the WebSocket chat server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Optional port for the HTTP API (health check and one-shot questions).
    #[arg(long, env = "HTTP_PORT")]
    pub http_port: Option<u16>,

    /// New WebSocket connections accepted per second before dropping.
    #[arg(
        long,
        env = "MAX_CONNECTIONS_PER_SECOND",
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_connections_per_second: u32,
}

impl Args {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: self.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: MODEL_ID.to_string(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
