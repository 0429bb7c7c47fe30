use serde::{ Serialize, Deserialize };
use chrono::{ DateTime, Utc };

use crate::assistant::ReplyOrigin;
use crate::models::chat::ChatMessage;

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat")] Chat {
        content: String,
    },
    #[serde(rename = "history")]
    History,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "greeting")] Greeting {
        session_id: String,
        content: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "response")] Response {
        content: String,
        origin: ReplyOrigin,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "history")] History {
        messages: Vec<ChatMessage>,
    },
    #[serde(rename = "error")] Error {
        message: String,
    },
    #[serde(rename = "processing")]
    Processing,
}
