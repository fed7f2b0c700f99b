//! Validated JSON and query extractors
//!
//! Extract request input and validate it using the validator crate.
//! Malformed input and rule violations are both reported as 422.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// Validated JSON extractor
///
/// Extracts a JSON body and validates it using the `validator` crate.
/// The inner type must implement both `Deserialize` and `Validate`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| match e {
            JsonRejection::JsonDataError(e) => ApiError::invalid_body(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => ApiError::invalid_body(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => ApiError::invalid_body(e.body_text()),
            JsonRejection::BytesRejection(e) => ApiError::invalid_body(e.body_text()),
            _ => ApiError::invalid_body("Invalid JSON body"),
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Optional validated JSON extractor
///
/// Similar to ValidatedJson but yields the type's default for empty bodies.
#[derive(Debug, Clone)]
pub struct OptionalValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let has_body = req
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<usize>().ok())
            .is_some_and(|len| len > 0);

        if !has_body {
            return Ok(OptionalValidatedJson(T::default()));
        }

        let ValidatedJson(value) = ValidatedJson::from_request(req, state).await?;
        Ok(OptionalValidatedJson(value))
    }
}

/// Validated query string extractor
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use chat_core::entities::DeleteScope;
    use chat_service::dto::{DeleteMessageCommand, ListMessagesQuery, SearchMessagesCommand};

    fn parts(uri: &str) -> Parts {
        HttpRequest::builder().uri(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_query_defaults() {
        let mut p = parts("/chats/1/messages");
        let ValidatedQuery(query) = ValidatedQuery::<ListMessagesQuery>::from_request_parts(&mut p, &())
            .await
            .unwrap();
        assert!(query.before.is_none());
        assert_eq!(query.limit(), ListMessagesQuery::DEFAULT_LIMIT);
    }

    #[tokio::test]
    async fn test_query_cursor_and_limit() {
        let mut p = parts("/chats/1/messages?before=123456789&limit=25");
        let ValidatedQuery(query) = ValidatedQuery::<ListMessagesQuery>::from_request_parts(&mut p, &())
            .await
            .unwrap();
        assert_eq!(query.before.map(|id| id.to_string()).as_deref(), Some("123456789"));
        assert_eq!(query.limit(), 25);
    }

    #[tokio::test]
    async fn test_query_limit_out_of_range() {
        let mut p = parts("/chats/1/messages?limit=500");
        let err = ValidatedQuery::<ListMessagesQuery>::from_request_parts(&mut p, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_scope_from_query() {
        let mut p = parts("/messages/1?scope=for_all");
        let ValidatedQuery(cmd) = ValidatedQuery::<DeleteMessageCommand>::from_request_parts(&mut p, &())
            .await
            .unwrap();
        assert_eq!(cmd.scope, DeleteScope::ForAll);

        let mut p = parts("/messages/1?scope=everyone");
        assert!(ValidatedQuery::<DeleteMessageCommand>::from_request_parts(&mut p, &())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_search_query_requires_q() {
        let mut p = parts("/search/messages?page=2");
        let err = ValidatedQuery::<SearchMessagesCommand>::from_request_parts(&mut p, &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_QUERY_PARAMETER");
    }
}
