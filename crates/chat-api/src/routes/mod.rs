//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{chats, health, messages, reactions, search, users};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(chat_routes())
        .merge(message_routes())
        .merge(reaction_routes())
        .route("/search/messages", get(search::search_messages))
        .route("/users/@me/status", put(users::update_status))
}

/// Chat routes
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(chats::list_chats).post(chats::create_chat))
        .route("/chats/:chat_id", get(chats::get_chat))
        // Membership
        .route(
            "/chats/:chat_id/participants",
            get(chats::list_participants).post(chats::add_participants),
        )
        .route(
            "/chats/:chat_id/participants/:user_id",
            delete(chats::remove_participant),
        )
        // Per-user chat state
        .route(
            "/chats/:chat_id/archive",
            put(chats::archive_chat).delete(chats::unarchive_chat),
        )
        .route(
            "/chats/:chat_id/mute",
            put(chats::mute_chat).delete(chats::unmute_chat),
        )
        .route(
            "/chats/:chat_id/pin",
            put(chats::pin_chat).delete(chats::unpin_chat),
        )
        // Messages
        .route(
            "/chats/:chat_id/messages",
            get(messages::get_messages).post(messages::create_message),
        )
        .route("/chats/:chat_id/typing", post(chats::typing_indicator))
        .route("/chats/:chat_id/export", get(chats::export_chat))
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages/forward", post(messages::forward_messages))
        .route(
            "/messages/:message_id",
            get(messages::get_message).delete(messages::delete_message),
        )
        .route("/messages/:message_id/replies", get(messages::get_replies))
        .route("/messages/:message_id/forward", post(messages::forward_message))
        .route(
            "/messages/:message_id/read",
            get(messages::get_read_receipts).post(messages::mark_read),
        )
        .route(
            "/messages/:message_id/reactions",
            get(reactions::get_reactions).post(reactions::add_reaction),
        )
}

/// Reaction routes
fn reaction_routes() -> Router<AppState> {
    Router::new().route(
        "/reactions/:reaction_id",
        patch(reactions::update_reaction).delete(reactions::remove_reaction),
    )
}
