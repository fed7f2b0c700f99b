//! Chat handlers
//!
//! Endpoints for chat lifecycle, membership and per-user chat state.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::{
    AddParticipantsCommand, ChatListFilter, ChatResponse, CreateChatCommand, ExportChatCommand,
    MuteChatCommand, ParticipantResponse, TypingRequest,
};
use chat_service::services::{ChatService, ChatStateService, ExportService, TypingService};

use crate::extractors::{
    AuthUser, ChatIdPath, OptionalValidatedJson, ParticipantPath, ValidatedJson, ValidatedQuery,
};
use crate::response::{ApiResult, Created, Download, NoContent};
use crate::state::AppState;

/// List the caller's chats
///
/// GET /chats?archived=&muted=&pinned=
pub async fn list_chats(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ChatListFilter>,
) -> ApiResult<Json<Vec<ChatResponse>>> {
    let service = ChatService::new(state.service_context());
    let chats = service.list_chats(auth.user_id, filter).await?;
    Ok(Json(chats))
}

/// Create a private or group chat
///
/// POST /chats
pub async fn create_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateChatCommand>,
) -> ApiResult<Created<Json<ChatResponse>>> {
    let service = ChatService::new(state.service_context());
    let chat = service.create_chat(auth.user_id, request).await?;
    Ok(Created(Json(chat)))
}

/// GET /chats/{chat_id}
pub async fn get_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatService::new(state.service_context());
    let chat = service.get_chat(path.chat_id()?, auth.user_id).await?;
    Ok(Json(chat))
}

/// GET /chats/{chat_id}/participants
pub async fn list_participants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<Json<Vec<ParticipantResponse>>> {
    let service = ChatService::new(state.service_context());
    let participants = service
        .list_participants(path.chat_id()?, auth.user_id)
        .await?;
    Ok(Json(participants))
}

/// Add users to a group chat
///
/// POST /chats/{chat_id}/participants
pub async fn add_participants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    ValidatedJson(request): ValidatedJson<AddParticipantsCommand>,
) -> ApiResult<Json<Vec<ParticipantResponse>>> {
    let service = ChatService::new(state.service_context());
    let added = service
        .add_participants(path.chat_id()?, auth.user_id, request)
        .await?;
    Ok(Json(added))
}

/// Leave a chat, or remove someone as its creator
///
/// DELETE /chats/{chat_id}/participants/{user_id}
pub async fn remove_participant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ParticipantPath>,
) -> ApiResult<NoContent> {
    let service = ChatService::new(state.service_context());
    service
        .remove_participant(path.chat_id()?, auth.user_id, path.user_id()?)
        .await?;
    Ok(NoContent)
}

/// PUT /chats/{chat_id}/archive
pub async fn archive_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatStateService::new(state.service_context());
    Ok(Json(service.archive(path.chat_id()?, auth.user_id).await?))
}

/// DELETE /chats/{chat_id}/archive
pub async fn unarchive_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatStateService::new(state.service_context());
    Ok(Json(service.unarchive(path.chat_id()?, auth.user_id).await?))
}

/// Mute a chat for the caller; an empty body mutes indefinitely
///
/// PUT /chats/{chat_id}/mute
pub async fn mute_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    OptionalValidatedJson(request): OptionalValidatedJson<MuteChatCommand>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatStateService::new(state.service_context());
    Ok(Json(service.mute(path.chat_id()?, auth.user_id, request).await?))
}

/// DELETE /chats/{chat_id}/mute
pub async fn unmute_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatStateService::new(state.service_context());
    Ok(Json(service.unmute(path.chat_id()?, auth.user_id).await?))
}

/// PUT /chats/{chat_id}/pin
pub async fn pin_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatStateService::new(state.service_context());
    Ok(Json(service.pin(path.chat_id()?, auth.user_id).await?))
}

/// DELETE /chats/{chat_id}/pin
pub async fn unpin_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatStateService::new(state.service_context());
    Ok(Json(service.unpin(path.chat_id()?, auth.user_id).await?))
}

/// Typing indicator
///
/// POST /chats/{chat_id}/typing
pub async fn typing_indicator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    ValidatedJson(request): ValidatedJson<TypingRequest>,
) -> ApiResult<NoContent> {
    let service = TypingService::new(state.service_context());
    service
        .set_typing(path.chat_id()?, auth.user_id, request.typing)
        .await?;
    Ok(NoContent)
}

/// Download a transcript of the chat
///
/// GET /chats/{chat_id}/export?format=&from=&to=&page=&per_page=
pub async fn export_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ChatIdPath>,
    ValidatedQuery(request): ValidatedQuery<ExportChatCommand>,
) -> ApiResult<Download> {
    let service = ExportService::new(state.service_context());
    let export = service
        .export(path.chat_id()?, auth.user_id, request)
        .await?;
    Ok(Download(export))
}
