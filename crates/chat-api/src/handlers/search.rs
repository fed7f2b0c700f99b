//! Search handlers

use axum::{extract::State, Json};
use chat_service::dto::{PaginatedResponse, SearchMessagesCommand, SearchResultResponse};
use chat_service::services::SearchService;

use crate::extractors::{AuthUser, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// Search messages across the caller's chats
///
/// GET /search/messages?q=&chat_id=&page=&per_page=
pub async fn search_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(request): ValidatedQuery<SearchMessagesCommand>,
) -> ApiResult<Json<PaginatedResponse<SearchResultResponse>>> {
    let service = SearchService::new(state.service_context());
    let results = service.search(auth.user_id, request).await?;
    Ok(Json(results))
}
