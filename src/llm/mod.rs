pub mod chat;

use std::time::Duration;
use thiserror::Error;

use crate::config::persona::MODEL_ID;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Returns the API key only when it holds something other than whitespace.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: MODEL_ID.to_string(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    /// The upstream service answered with an error document.
    #[error("upstream error ({status}): {message}")]
    Api {
        status: String,
        message: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no API key configured")]
    MissingApiKey,
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Text reported by the upstream service itself, if any.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            LlmError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_is_no_credential() {
        let config = LlmConfig { api_key: Some("  ".into()), ..LlmConfig::default() };
        assert_eq!(config.credential(), None);

        let config = LlmConfig { api_key: Some("abc".into()), ..LlmConfig::default() };
        assert_eq!(config.credential(), Some("abc"));
    }

    #[test]
    fn only_api_errors_expose_upstream_text() {
        let err = LlmError::Api { status: "429".into(), message: "quota exceeded".into() };
        assert_eq!(err.upstream_message(), Some("quota exceeded"));
        assert_eq!(LlmError::InvalidResponse("x".into()).upstream_message(), None);
    }
}
