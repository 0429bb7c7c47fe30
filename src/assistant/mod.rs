//! The assistant gateway: one utterance in, one display-ready reply out.
//!
//! `AssistantGateway::respond` never fails. Upstream problems are logged and
//! turned into one of a handful of canned replies, each of which points the
//! visitor at a human contact address.

pub mod markup;

use log::{ error, info, warn };
use serde::{ Deserialize, Serialize };
use std::sync::Arc;

use crate::config::persona::{ CONTACT_EMAIL, GENERATION, MODEL_ID, SYSTEM_INSTRUCTION };
use crate::llm::chat::{ new_client, ChatClient, CompletionRequest };
use crate::llm::{ LlmConfig, LlmError };
use self::markup::clean_response_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// No API key configured; checked before any request is made.
    NotConfigured,
    Authentication,
    Quota,
    ModelUnavailable,
    /// The model answered but produced no usable text.
    EmptyReply,
    Generic,
}

impl FallbackKind {
    pub fn text(self) -> String {
        match self {
            FallbackKind::NotConfigured =>
                format!(
                    "🔧 AI service is currently being configured. Please contact our team directly at {} for immediate assistance, or try again shortly.",
                    CONTACT_EMAIL
                ),
            FallbackKind::Authentication =>
                format!(
                    "We're currently enhancing our AI authentication systems. Please contact our team directly at {} for immediate support while we complete this upgrade.",
                    CONTACT_EMAIL
                ),
            FallbackKind::Quota =>
                format!(
                    "Our AI systems are currently handling high demand. Please try again in a few moments or contact our team directly at {} for priority assistance.",
                    CONTACT_EMAIL
                ),
            FallbackKind::ModelUnavailable =>
                format!(
                    "Our AI model is currently being optimized. Please try again shortly or contact our team directly at {} for assistance.",
                    CONTACT_EMAIL
                ),
            FallbackKind::EmptyReply =>
                format!(
                    "I apologize, my neural link is experiencing interference. Please contact our human team directly at {} for immediate assistance.",
                    CONTACT_EMAIL
                ),
            FallbackKind::Generic =>
                format!(
                    "Our AI systems are currently optimizing for better performance. Please try again shortly or contact our team directly at {} for immediate support.",
                    CONTACT_EMAIL
                ),
        }
    }
}

/// Maps upstream error text to a fallback. Rules are checked in order and the
/// first hit wins.
pub fn classify_error_message(message: &str) -> FallbackKind {
    const RULES: &[(&[&str], FallbackKind)] = &[
        (&["api key", "api_key", "credential"], FallbackKind::Authentication),
        (&["quota", "rate limit"], FallbackKind::Quota),
        (&["model", "not found"], FallbackKind::ModelUnavailable),
    ];

    let lowered = message.to_lowercase();
    RULES.iter()
        .find(|(needles, _)| needles.iter().any(|n| lowered.contains(n)))
        .map(|(_, kind)| *kind)
        .unwrap_or(FallbackKind::Generic)
}

/// Transport failures carry request URLs (which mention `models/`), so only
/// text the upstream service wrote itself is classified.
pub fn classify_error(err: &LlmError) -> FallbackKind {
    match err.upstream_message() {
        Some(message) => classify_error_message(message),
        None => FallbackKind::Generic,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyOrigin {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub origin: ReplyOrigin,
    pub fallback: Option<FallbackKind>,
}

impl AssistantReply {
    fn model(text: String) -> Self {
        Self { text, origin: ReplyOrigin::Model, fallback: None }
    }

    pub fn fallback(kind: FallbackKind) -> Self {
        Self { text: kind.text(), origin: ReplyOrigin::Fallback, fallback: Some(kind) }
    }
}

/// Shared by every chat session. Holds the upstream client, or nothing when no
/// credential was configured.
#[derive(Clone)]
pub struct AssistantGateway {
    client: Option<Arc<dyn ChatClient>>,
}

impl AssistantGateway {
    pub fn new(client: Option<Arc<dyn ChatClient>>) -> Self {
        Self { client }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = new_client(config)?;
        if client.is_none() {
            warn!("No Gemini API key configured; assistant will answer with the setup notice");
        }
        Ok(Self::new(client))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn model(&self) -> String {
        self.client
            .as_ref()
            .map(|c| c.get_model())
            .unwrap_or_else(|| MODEL_ID.to_string())
    }

    /// The utterance is expected to be trimmed and non-empty already.
    pub async fn respond(&self, utterance: &str) -> AssistantReply {
        let client = match &self.client {
            Some(client) => client,
            None => return AssistantReply::fallback(FallbackKind::NotConfigured),
        };

        let request = CompletionRequest {
            system_instruction: SYSTEM_INSTRUCTION,
            prompt: utterance,
            generation: GENERATION,
        };

        match client.complete(&request).await {
            Ok(resp) => {
                let cleaned = resp.response
                    .as_deref()
                    .map(clean_response_text)
                    .filter(|t| !t.is_empty());
                match cleaned {
                    Some(text) => {
                        info!("Assistant replied with {} chars", text.len());
                        AssistantReply::model(text)
                    }
                    None => {
                        warn!("Upstream returned no text");
                        AssistantReply::fallback(FallbackKind::EmptyReply)
                    }
                }
            }
            Err(e) => {
                let kind = classify_error(&e);
                error!("AI service error ({:?}): {}", kind, e);
                AssistantReply::fallback(kind)
            }
        }
    }
}
