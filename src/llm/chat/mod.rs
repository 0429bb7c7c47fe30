pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;

use super::{ LlmConfig, LlmError };
use crate::config::persona::GenerationSettings;
use self::gemini::GeminiChatClient;

/// One non-streaming completion: a system instruction plus a single user turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system_instruction: &'a str,
    pub prompt: &'a str,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// `None` when the upstream answered successfully but produced no text.
    pub response: Option<String>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>
    ) -> Result<CompletionResponse, LlmError>;

    fn get_model(&self) -> String;
}

/// Builds the upstream client, or `None` when no credential is configured.
pub fn new_client(config: &LlmConfig) -> Result<Option<Arc<dyn ChatClient>>, LlmError> {
    if config.credential().is_none() {
        return Ok(None);
    }
    let client: Arc<dyn ChatClient> = Arc::new(GeminiChatClient::from_config(config)?);
    Ok(Some(client))
}
