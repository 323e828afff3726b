//! Axum extractors for request handling
//!
//! Custom extractors for authentication, client addressing, and validation.

mod auth;
mod client_ip;
mod query;
mod validated;

pub use auth::{ApiKeyAuth, API_KEY_HEADER};
pub use client_ip::ClientIp;
pub use query::TrackListQuery;
pub use validated::ValidatedJson;
