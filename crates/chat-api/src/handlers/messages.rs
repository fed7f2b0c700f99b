//! Message handlers
//!
//! Endpoints for message operations.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::{
    DeleteMessageCommand, ForwardBatchCommand, ForwardMessageCommand, ListMessagesQuery,
    MessageResponse, ReadMarkerResponse, SendMessageCommand,
};
use chat_service::services::{MessageService, ReadService};

use crate::extractors::{AuthUser, ChatIdPath, MessageIdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Get visible messages in a chat, newest first
///
/// GET /chats/{chat_id}/messages?before=&limit=
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    ValidatedQuery(query): ValidatedQuery<ListMessagesQuery>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let messages = service
        .list_messages(path.chat_id()?, auth.user_id, query)
        .await?;
    Ok(Json(messages))
}

/// Send a message (a reply when `reply_to` is set)
///
/// POST /chats/{chat_id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    ValidatedJson(request): ValidatedJson<SendMessageCommand>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service
        .send_message(path.chat_id()?, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Get message by ID
///
/// GET /messages/{message_id}
pub async fn get_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
) -> ApiResult<Json<MessageResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service
        .get_message(path.message_id()?, auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Delete a message for the sender or for everyone
///
/// DELETE /messages/{message_id}?scope=for_sender|for_all
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
    ValidatedQuery(request): ValidatedQuery<DeleteMessageCommand>,
) -> ApiResult<NoContent> {
    let service = MessageService::new(state.service_context());
    service
        .delete_message(path.message_id()?, auth.user_id, request.scope)
        .await?;
    Ok(NoContent)
}

/// GET /messages/{message_id}/replies
pub async fn get_replies(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let replies = service.replies(path.message_id()?, auth.user_id).await?;
    Ok(Json(replies))
}

/// Forward one message into another chat
///
/// POST /messages/{message_id}/forward
pub async fn forward_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
    ValidatedJson(request): ValidatedJson<ForwardMessageCommand>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service
        .forward_message(path.message_id()?, auth.user_id, request.chat_id)
        .await?;
    Ok(Created(Json(response)))
}

/// Forward several messages, in the given order
///
/// POST /messages/forward
pub async fn forward_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ForwardBatchCommand>,
) -> ApiResult<Created<Json<Vec<MessageResponse>>>> {
    let service = MessageService::new(state.service_context());
    let forwarded = service.forward_batch(auth.user_id, request).await?;
    Ok(Created(Json(forwarded)))
}

/// POST /messages/{message_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
) -> ApiResult<Json<ReadMarkerResponse>> {
    let service = ReadService::new(state.service_context());
    let marker = service.mark_read(path.message_id()?, auth.user_id).await?;
    Ok(Json(marker))
}

/// GET /messages/{message_id}/read
pub async fn get_read_receipts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
) -> ApiResult<Json<Vec<ReadMarkerResponse>>> {
    let service = ReadService::new(state.service_context());
    let markers = service
        .read_receipts(path.message_id()?, auth.user_id)
        .await?;
    Ok(Json(markers))
}
