//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chat_cache::{Publisher, RedisPool};
use chat_common::{AppConfig, AppError, JwtService};
use chat_core::SnowflakeGenerator;
use chat_db::{
    create_pool, run_migrations, PgChatRepository, PgMessageRepository, PgParticipantRepository,
    PgReactionRepository, PgReadMarkerRepository, PgUserRepository, PoolConfig,
};
use chat_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with the base middleware stack
pub fn create_app(state: AppState) -> Router {
    apply_middleware(create_router())
        .merge(health_routes())
        .with_state(state)
}

/// Build the application with rate limiting and configured CORS
///
/// Health routes are merged outside the rate limiter.
pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Result<Router, AppError> {
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    Ok(api.merge(health_routes()).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool, &config.database.migrations_dir)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .chat_repo(Arc::new(PgChatRepository::new(pool.clone())))
        .participant_repo(Arc::new(PgParticipantRepository::new(pool.clone())))
        .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
        .read_marker_repo(Arc::new(PgReadMarkerRepository::new(pool.clone())))
        .event_bus(Arc::new(Publisher::new(redis_pool.clone())))
        .snowflake_generator(snowflake_generator)
        .mute_window(config.chat.mute_window())
        .export_max_page_size(config.chat.export_max_page_size)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, jwt_service)
        .with_db_pool(pool)
        .with_redis_pool(redis_pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;

    let state = create_app_state(&config).await?;
    let app = create_app_with_config(state, &config)?;

    run_server(app, addr).await
}
