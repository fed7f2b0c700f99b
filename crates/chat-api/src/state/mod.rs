//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the token verifier and the infrastructure pinged by readiness checks.

use std::sync::Arc;

use chat_cache::RedisPool;
use chat_common::JwtService;
use chat_db::PgPool;
use chat_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Access token verifier
    jwt_service: Arc<JwtService>,
    db_pool: Option<PgPool>,
    redis_pool: Option<RedisPool>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, jwt_service: JwtService) -> Self {
        Self {
            service_context: Arc::new(service_context),
            jwt_service: Arc::new(jwt_service),
            db_pool: None,
            redis_pool: None,
        }
    }

    #[must_use]
    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_redis_pool(mut self, pool: RedisPool) -> Self {
        self.redis_pool = Some(pool);
        self
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Whether a database connection can be acquired
    pub async fn database_ready(&self) -> bool {
        match &self.db_pool {
            Some(pool) => pool.acquire().await.is_ok(),
            None => false,
        }
    }

    /// Whether Redis answers a PING
    pub async fn redis_ready(&self) -> bool {
        match &self.redis_pool {
            Some(pool) => pool.health_check().await.is_ok(),
            None => false,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("db_pool", &self.db_pool.is_some())
            .field("redis_pool", &self.redis_pool.is_some())
            .finish_non_exhaustive()
    }
}
