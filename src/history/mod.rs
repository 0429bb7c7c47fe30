//! In-memory conversation store for a single chat session.
//!
//! Messages are append-only and kept in arrival order. Nothing is persisted:
//! the store lives exactly as long as the session that owns it.

use log::debug;
use thiserror::Error;

use crate::config::persona::GREETING;
use crate::models::chat::{ ChatMessage, Role };

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("user messages must contain text")]
    EmptyUserMessage,
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
}

impl ConversationStore {
    /// Creates a store already holding the assistant greeting.
    pub fn new() -> Self {
        let mut store = Self { messages: Vec::new() };
        store.initialize();
        store
    }

    /// Resets the conversation to the single greeting message.
    pub fn initialize(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage::assistant(GREETING));
    }

    pub fn append(&mut self, message: ChatMessage) -> Result<&ChatMessage, HistoryError> {
        if message.role() == Role::User && message.text().trim().is_empty() {
            return Err(HistoryError::EmptyUserMessage);
        }
        debug!("Appending {} message #{}", message.role(), self.messages.len());
        self.messages.push(message);
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Assistant text is never validated, so this cannot fail.
    pub fn append_assistant(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::assistant(text));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_transcript(store: &ConversationStore) -> String {
    let mut result = String::new();
    for msg in store.messages() {
        result.push_str(&format!("{}: {}\n", msg.role(), msg.text()));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_leaves_single_greeting() {
        let mut store = ConversationStore::new();
        store.append(ChatMessage::user("hello")).unwrap();
        store.initialize();

        assert_eq!(store.len(), 1);
        assert_eq!(store.messages()[0].role(), Role::Assistant);
        assert_eq!(store.messages()[0].text(), GREETING);
    }

    #[test]
    fn append_preserves_call_order() {
        let mut store = ConversationStore::new();
        let texts = ["one", "two", "three", "two", "five"];
        for (i, text) in texts.iter().enumerate() {
            let msg = if i % 2 == 0 {
                ChatMessage::user(*text)
            } else {
                ChatMessage::assistant(*text)
            };
            store.append(msg).unwrap();
        }

        assert_eq!(store.len(), texts.len() + 1);
        let stored: Vec<&str> = store.messages()[1..].iter().map(|m| m.text()).collect();
        assert_eq!(stored, texts);
    }

    #[test]
    fn rejects_blank_user_message() {
        let mut store = ConversationStore::new();
        assert_eq!(store.append(ChatMessage::user("   ")), Err(HistoryError::EmptyUserMessage));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn transcript_lists_roles() {
        let mut store = ConversationStore::new();
        store.append(ChatMessage::user("What do you do?")).unwrap();
        let transcript = format_transcript(&store);
        assert!(transcript.starts_with("Assistant: Hello!"));
        assert!(transcript.ends_with("User: What do you do?\n"));
    }
}
