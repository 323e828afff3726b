//! Track handlers
//!
//! Endpoints for registering, listing, updating, and deleting tracks.

use axum::{
    extract::{Path, State},
    Json,
};
use track_service::{
    CreateTrackRequest, OpenEventResponse, TrackResponse, TrackService, TrackSummaryResponse,
    UpdateTrackRequest,
};

use crate::extractors::{ApiKeyAuth, TrackListQuery, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a track
///
/// POST /api/tracks
pub async fn create_track(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    ValidatedJson(request): ValidatedJson<CreateTrackRequest>,
) -> ApiResult<Created<Json<TrackResponse>>> {
    let service = TrackService::new(state.service_context());
    let response = service.create_track(request).await?;
    Ok(Created(Json(response)))
}

/// List tracks with their open aggregates
///
/// GET /api/tracks
pub async fn list_tracks(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    TrackListQuery(query): TrackListQuery,
) -> ApiResult<Json<Vec<TrackSummaryResponse>>> {
    let service = TrackService::new(state.service_context());
    let tracks = service.list_tracks(query).await?;
    Ok(Json(tracks))
}

/// Get track by ID
///
/// GET /api/tracks/{track_id}
pub async fn get_track(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(track_id): Path<String>,
) -> ApiResult<Json<TrackSummaryResponse>> {
    let track_id = track_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid track id format"))?;

    let service = TrackService::new(state.service_context());
    let response = service.get_track(track_id).await?;
    Ok(Json(response))
}

/// Update pinned flag and/or notes
///
/// PATCH /api/tracks/{track_id}
pub async fn update_track(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(track_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTrackRequest>,
) -> ApiResult<Json<TrackSummaryResponse>> {
    let track_id = track_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid track id format"))?;

    let service = TrackService::new(state.service_context());
    let response = service.update_track(track_id, request).await?;
    Ok(Json(response))
}

/// Delete track and its open events
///
/// DELETE /api/tracks/{track_id}
pub async fn delete_track(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(track_id): Path<String>,
) -> ApiResult<NoContent> {
    let track_id = track_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid track id format"))?;

    let service = TrackService::new(state.service_context());
    service.delete_track(track_id).await?;
    Ok(NoContent)
}

/// All open events for a track, newest first
///
/// GET /api/tracks/{track_id}/opens
pub async fn list_opens(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(track_id): Path<String>,
) -> ApiResult<Json<Vec<OpenEventResponse>>> {
    let track_id = track_id
        .parse()
        .map_err(|_| ApiError::invalid_path("Invalid track id format"))?;

    let service = TrackService::new(state.service_context());
    let opens = service.list_opens(track_id).await?;
    Ok(Json(opens))
}
