//! Reaction handlers
//!
//! Endpoints for message reactions.

use axum::{
    extract::{Path, State},
    Json,
};
use chat_service::dto::{AddReactionCommand, ReactionResponse, UpdateReactionCommand};
use chat_service::services::ReactionService;

use crate::extractors::{AuthUser, MessageIdPath, ReactionIdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /messages/{message_id}/reactions
pub async fn get_reactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let service = ReactionService::new(state.service_context());
    let reactions = service
        .list_reactions(path.message_id()?, auth.user_id)
        .await?;
    Ok(Json(reactions))
}

/// Add reaction to message
///
/// POST /messages/{message_id}/reactions
pub async fn add_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
    ValidatedJson(request): ValidatedJson<AddReactionCommand>,
) -> ApiResult<Created<Json<ReactionResponse>>> {
    let service = ReactionService::new(state.service_context());
    let reaction = service
        .add_reaction(path.message_id()?, auth.user_id, &request.emoji)
        .await?;
    Ok(Created(Json(reaction)))
}

/// Change the emoji of an own reaction
///
/// PATCH /reactions/{reaction_id}
pub async fn update_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ReactionIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateReactionCommand>,
) -> ApiResult<Json<ReactionResponse>> {
    let service = ReactionService::new(state.service_context());
    let reaction = service
        .update_reaction(path.reaction_id()?, auth.user_id, &request.emoji)
        .await?;
    Ok(Json(reaction))
}

/// Remove own reaction
///
/// DELETE /reactions/{reaction_id}
pub async fn remove_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<ReactionIdPath>,
) -> ApiResult<NoContent> {
    let service = ReactionService::new(state.service_context());
    service
        .remove_reaction(path.reaction_id()?, auth.user_id)
        .await?;
    Ok(NoContent)
}
