//! API key extractor
//!
//! Guards the dashboard API with the static key from configuration.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use track_common::AppError;

use crate::response::ApiError;
use crate::state::AppState;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the configured API key
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyAuth;

#[async_trait]
impl<S> FromRequestParts<S> for ApiKeyAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AppError::MissingApiKey)?;

        let app_state = AppState::from_ref(state);

        if provided != app_state.api_key() {
            tracing::warn!("Rejected request with wrong API key");
            return Err(AppError::InvalidApiKey.into());
        }

        Ok(ApiKeyAuth)
    }
}
