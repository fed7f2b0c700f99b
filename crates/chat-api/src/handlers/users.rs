//! User handlers
//!
//! Endpoints acting on the authenticated user.

use axum::{extract::State, Json};
use chat_service::dto::{PresenceResponse, UpdateStatusRequest};
use chat_service::services::PresenceService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Update the caller's online status
///
/// PUT /users/@me/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<PresenceResponse>> {
    let service = PresenceService::new(state.service_context());
    let response = service.set_status(auth.user_id, request.status).await?;
    Ok(Json(response))
}
