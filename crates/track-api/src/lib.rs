//! # track-api
//!
//! REST API and tracking pixel server built with Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod workers;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
