//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors render through
//! `kernel::error::AppError` inside the library crates.

mod config;

use std::sync::Arc;

use auth::middleware::require_auth_session;
use auth::{PgAuthRepository, SessionStore, auth_middleware_state, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use inventory::{PgInventoryRepository, inventory_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,inventory=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = Arc::new(config.auth);
    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    let sessions = SessionStore::new(auth_repo.clone(), auth_config.clone());

    // Startup cleanup: errors here should not prevent server startup
    if let Err(e) = sessions.sweep_expired().await {
        tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
    }

    if let Some(period) = config.session_sweep_interval {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick fires immediately; startup already swept
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = sessions.sweep_expired().await {
                    tracing::warn!(error = %e, "Periodic session cleanup failed");
                }
            }
        });
        tracing::info!(interval_secs = period.as_secs(), "Session sweep scheduled");
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router. The session check skips the public `/auth` prefix.
    let app = Router::new()
        .nest(
            "/auth",
            auth_router(PgAuthRepository::new(pool.clone()), auth_config.clone()),
        )
        .nest(
            "/categories",
            inventory_router(
                PgInventoryRepository::new(pool.clone()),
                Arc::new(config.inventory),
            ),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_middleware_state(auth_repo, auth_config),
            require_auth_session::<PgAuthRepository>,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
