//! Test fixtures
//!
//! Request bodies and the subset of response fields the tests assert on.

use serde::{Deserialize, Serialize};

/// Create chat request
#[derive(Debug, Serialize)]
pub struct CreateChatRequest {
    pub kind: &'static str,
    pub participant_ids: Vec<String>,
    pub name: Option<String>,
}

impl CreateChatRequest {
    pub fn private(with: &str) -> Self {
        Self {
            kind: "private",
            participant_ids: vec![with.to_string()],
            name: None,
        }
    }

    pub fn group(name: &str, members: &[&str]) -> Self {
        Self {
            kind: "group",
            participant_ids: members.iter().map(ToString::to_string).collect(),
            name: Some(name.to_string()),
        }
    }
}

/// Chat response as seen by the caller
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub kind: String,
    pub name: Option<String>,
    pub creator_id: String,
    pub archived: bool,
    pub muted: bool,
    pub muted_until: Option<String>,
    pub pinned: bool,
}

/// Send message request
#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub reply_to: Option<String>,
}

impl SendMessageRequest {
    pub fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            reply_to: None,
        }
    }

    pub fn reply(content: &str, message_id: &str) -> Self {
        Self {
            content: content.to_string(),
            reply_to: Some(message_id.to_string()),
        }
    }
}

/// Message response
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub message_type: String,
    pub reply_to: Option<String>,
    pub forwarded_from: Option<String>,
}

/// Add or change a reaction
#[derive(Debug, Serialize)]
pub struct ReactionRequest {
    pub emoji: String,
}

impl ReactionRequest {
    pub fn new(emoji: &str) -> Self {
        Self {
            emoji: emoji.to_string(),
        }
    }
}

/// Reactor identity
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

/// Reaction response
#[derive(Debug, Deserialize)]
pub struct ReactionResponse {
    pub id: String,
    pub message_id: String,
    pub emoji: String,
    pub user: UserResponse,
}

/// Forward request
#[derive(Debug, Serialize)]
pub struct ForwardRequest {
    pub chat_id: String,
}

/// Read receipt
#[derive(Debug, Deserialize)]
pub struct ReadMarkerResponse {
    pub message_id: String,
    pub user_id: String,
}

/// Ranked search hit
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub message: MessageResponse,
    pub occurrences: i64,
}

/// Page envelope
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
