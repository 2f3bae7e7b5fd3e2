// src/models/chat.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One entry in the support-chat transcript, stored under 'chatMessages'.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Millisecond timestamp doubling as a message id.
    pub id: i64,
    pub sender: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub is_bot: bool,
}

/// DTO for posting a chat message.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 500, message = "Message must be 1 to 500 characters"))]
    pub message: String,
}
