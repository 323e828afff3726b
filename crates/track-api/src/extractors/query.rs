//! Track list query extractor
//!
//! Wraps the list filter deserialization so malformed query strings come
//! back as structured validation errors instead of axum's plain-text 400.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use track_service::ListTracksQuery;

use crate::response::ApiError;

/// List filters for `GET /api/tracks`
#[derive(Debug, Default)]
pub struct TrackListQuery(pub ListTracksQuery);

#[async_trait]
impl<S> FromRequestParts<S> for TrackListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListTracksQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(TrackListQuery(query))
    }
}
