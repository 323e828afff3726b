//! Route definitions
//!
//! The pixel and health endpoints are anonymous; everything under /api
//! requires the API key, enforced by the `ApiKeyAuth` extractor in each
//! handler.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{health, pixel, stats, tracks};
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .merge(pixel_routes())
        .merge(health_routes())
}

/// Tracking pixel route (anonymous)
fn pixel_routes() -> Router<AppState> {
    Router::new().route("/p/:pixel_id", get(pixel::serve_pixel))
}

/// Health check route (anonymous)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// Dashboard API routes
fn api_routes() -> Router<AppState> {
    Router::new().merge(track_routes()).merge(stats_routes())
}

/// Track CRUD routes
fn track_routes() -> Router<AppState> {
    Router::new()
        .route("/tracks", post(tracks::create_track))
        .route("/tracks", get(tracks::list_tracks))
        .route("/tracks/:track_id", get(tracks::get_track))
        .route("/tracks/:track_id", patch(tracks::update_track))
        .route("/tracks/:track_id", delete(tracks::delete_track))
        .route("/tracks/:track_id/opens", get(tracks::list_opens))
}

/// Analytics routes
fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .route("/recipients", get(stats::get_recipients))
}
