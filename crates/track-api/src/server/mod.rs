//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};
use track_common::{AppConfig, AppError};
use track_db::{create_pool, run_migrations, PgOpenEventRepository, PgTrackRepository};
use track_geo::GeoResolver;
use track_notify::Mailer;
use track_service::ServiceContextBuilder;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;
use crate::workers::spawn_notify_worker;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = track_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Apply schema
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Database schema applied");

    // GeoIP resolver; a missing database disables lookups, not the server
    let geo = Arc::new(GeoResolver::from_config(&config.geoip));
    info!(enabled = geo.is_enabled(), "GeoIP lookups");

    // SMTP transport; notifications run only when fully configured
    let mailer = config
        .smtp
        .as_ref()
        .map(Mailer::from_config)
        .transpose()
        .map_err(|e| AppError::Config(e.to_string()))?
        .map(Arc::new);
    info!(enabled = mailer.is_some(), "Operator notifications");

    // Create repositories
    let track_repo = Arc::new(PgTrackRepository::new(pool.clone()));
    let open_repo = Arc::new(PgOpenEventRepository::new(pool.clone()));

    // Build service context
    let mut builder = ServiceContextBuilder::new()
        .pool(pool)
        .track_repo(track_repo)
        .open_repo(open_repo)
        .geo(geo)
        .tracking(config.tracking.clone())
        .notify(config.notify.clone());
    if let Some(mailer) = mailer {
        builder = builder.mailer(mailer);
    }
    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server until shutdown
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Resolve once ctrl-c arrives
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();

    // Create app state
    let state = create_app_state(config).await?;

    // Notification worker, only when SMTP is configured
    if state.service_context().notifications_enabled() {
        spawn_notify_worker(state.clone());
    }

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, &addr).await
}
