//! Analytics handlers
//!
//! Endpoints for global statistics and per-recipient engagement.

use axum::{extract::State, Json};
use track_service::{RecipientEngagementResponse, StatsResponse, StatsService};

use crate::extractors::ApiKeyAuth;
use crate::response::ApiResult;
use crate::state::AppState;

/// Global open statistics and histograms
///
/// GET /api/stats
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
) -> ApiResult<Json<StatsResponse>> {
    let service = StatsService::new(state.service_context());
    let stats = service.global_stats().await?;
    Ok(Json(stats))
}

/// Per-recipient engagement, best score first
///
/// GET /api/recipients
pub async fn get_recipients(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
) -> ApiResult<Json<Vec<RecipientEngagementResponse>>> {
    let service = StatsService::new(state.service_context());
    let recipients = service.recipient_engagement().await?;
    Ok(Json(recipients))
}
