//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chat_core::{ChatKind, MessageType, OnlineStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset-paginated response
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Wrap a page that was fetched with one extra row to detect `has_more`
    pub fn from_lookahead(mut data: Vec<T>, page: i64, per_page: i64) -> Self {
        let limit = usize::try_from(per_page).unwrap_or(usize::MAX);
        let has_more = data.len() > limit;
        data.truncate(limit);
        Self {
            data,
            pagination: PaginationMeta {
                page,
                per_page,
                has_more,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: i64,
    pub per_page: i64,
    /// Whether more results exist
    pub has_more: bool,
}

// ============================================================================
// User Responses
// ============================================================================

/// Public user profile
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

// ============================================================================
// Chat Responses
// ============================================================================

/// A chat as seen by one participant
///
/// The flags are the caller's own; an elapsed mute is reported as unmuted.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub id: String,
    pub kind: ChatKind,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub archived: bool,
    pub muted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted_until: Option<DateTime<Utc>>,
    pub pinned: bool,
}

/// A chat member
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub chat_id: String,
    pub user: UserResponse,
    pub joined_at: DateTime<Utc>,
}

// ============================================================================
// Message Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    pub message_type: MessageType,
    pub blob_ref: Option<String>,
    pub reply_to: Option<String>,
    pub forwarded_from: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ranked search hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultResponse {
    pub message: MessageResponse,
    pub occurrences: i64,
}

/// Read receipt
#[derive(Debug, Clone, Serialize)]
pub struct ReadMarkerResponse {
    pub message_id: String,
    pub user_id: String,
    pub read_at: DateTime<Utc>,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// A single reaction with the reactor's identity
#[derive(Debug, Clone, Serialize)]
pub struct ReactionResponse {
    pub id: String,
    pub message_id: String,
    pub emoji: String,
    pub user: UserResponse,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Presence Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PresenceResponse {
    pub user_id: String,
    pub status: OnlineStatus,
    /// Number of chats the update was fanned out to
    pub chats_notified: usize,
}

// ============================================================================
// Export Responses
// ============================================================================

/// A rendered transcript, ready to be sent as a download
#[derive(Debug, Clone)]
pub struct ExportResponse {
    pub content_type: &'static str,
    pub filename: String,
    pub body: String,
    pub message_count: usize,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
