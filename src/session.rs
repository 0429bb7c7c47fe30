//! Caller-side state for one open chat surface: the conversation plus the
//! "request in flight" flag that keeps a session to one outstanding call.

use log::debug;
use thiserror::Error;
use uuid::Uuid;

use crate::assistant::{ AssistantGateway, AssistantReply };
use crate::history::{ ConversationStore, HistoryError };
use crate::models::chat::ChatMessage;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("message is empty")]
    EmptyUtterance,
    #[error("a reply is still pending")]
    RequestInFlight,
}

impl From<HistoryError> for SessionError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::EmptyUserMessage => SessionError::EmptyUtterance,
        }
    }
}

/// Clears the in-flight flag when dropped, so an abandoned `submit` does not
/// lock the session.
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug)]
pub struct ChatSession {
    id: String,
    store: ConversationStore,
    in_flight: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            store: ConversationStore::new(),
            in_flight: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Validates and records a user utterance, returning the trimmed text to
    /// hand to the gateway. Nothing is recorded when an error is returned.
    pub fn begin(&mut self, raw: &str) -> Result<String, SessionError> {
        if self.in_flight {
            return Err(SessionError::RequestInFlight);
        }
        let utterance = raw.trim();
        if utterance.is_empty() {
            return Err(SessionError::EmptyUtterance);
        }
        self.store.append(ChatMessage::user(utterance))?;
        self.in_flight = true;
        debug!("Session {} awaiting reply", self.id);
        Ok(utterance.to_string())
    }

    pub fn complete(&mut self, reply: &AssistantReply) -> &ChatMessage {
        self.in_flight = false;
        self.store.append_assistant(reply.text.as_str())
    }

    /// One full round trip: record the utterance, ask the gateway, record the
    /// reply.
    ///
    /// If the returned future is dropped before the gateway answers, the user
    /// message stays recorded without a reply and the session accepts the next
    /// message.
    pub async fn submit(
        &mut self,
        gateway: &AssistantGateway,
        raw: &str
    ) -> Result<&ChatMessage, SessionError> {
        let utterance = self.begin(raw)?;
        let guard = InFlight(&mut self.in_flight);
        let reply = gateway.respond(&utterance).await;
        drop(guard);
        Ok(self.complete(&reply))
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
