//! Track service
//!
//! Handles registration, listing, updates, and deletion of tracked messages.

use tracing::{info, instrument};
use track_core::entities::TrackedMessage;
use track_core::traits::TrackFilter;
use track_core::TrackingId;

use crate::dto::{
    CreateTrackRequest, ListTracksQuery, OpenEventResponse, OpenWithContext, SummaryWithConfig,
    TrackResponse, TrackSummaryResponse, TrackWithConfig, UpdateTrackRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Track service
pub struct TrackService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TrackService<'a> {
    /// Create a new TrackService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new tracked message
    #[instrument(skip(self, request))]
    pub async fn create_track(&self, request: CreateTrackRequest) -> ServiceResult<TrackResponse> {
        let track = TrackedMessage::new(
            normalized(request.recipient),
            normalized(request.subject),
            normalized(request.notes),
            normalized(request.message_group_id),
        );

        self.ctx.track_repo().create(&track).await?;

        info!(track_id = %track.id, "Track registered");

        Ok(TrackResponse::from(TrackWithConfig {
            track: &track,
            tracking: self.ctx.tracking(),
        }))
    }

    /// List tracks with their open aggregates, pinned first then newest first
    #[instrument(skip(self, query))]
    pub async fn list_tracks(
        &self,
        query: ListTracksQuery,
    ) -> ServiceResult<Vec<TrackSummaryResponse>> {
        let filter = TrackFilter {
            opened: query.opened,
            created_after: query.created_after,
            created_before: query.created_before,
            search: normalized(query.q),
            limit: query.limit.unwrap_or(0),
        };

        let summaries = self
            .ctx
            .track_repo()
            .list(&filter, self.ctx.suppression_window())
            .await?;

        Ok(summaries
            .into_iter()
            .map(|summary| {
                TrackSummaryResponse::from(SummaryWithConfig {
                    summary,
                    tracking: self.ctx.tracking(),
                })
            })
            .collect())
    }

    /// Get one track with its open aggregates
    #[instrument(skip(self))]
    pub async fn get_track(&self, id: TrackingId) -> ServiceResult<TrackSummaryResponse> {
        let summary = self
            .ctx
            .track_repo()
            .summarize(id, self.ctx.suppression_window())
            .await?
            .ok_or_else(|| ServiceError::not_found("Track", id.to_string()))?;

        Ok(TrackSummaryResponse::from(SummaryWithConfig {
            summary,
            tracking: self.ctx.tracking(),
        }))
    }

    /// Update the mutable fields of a track
    #[instrument(skip(self, request))]
    pub async fn update_track(
        &self,
        id: TrackingId,
        request: UpdateTrackRequest,
    ) -> ServiceResult<TrackSummaryResponse> {
        let mut track = self
            .ctx
            .track_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Track", id.to_string()))?;

        if let Some(pinned) = request.pinned {
            track.pinned = pinned;
        }
        if let Some(notes) = request.notes {
            // An empty string clears the stored notes
            track.notes = normalized(Some(notes));
        }

        self.ctx.track_repo().update(&track).await?;

        info!(track_id = %id, "Track updated");

        self.get_track(id).await
    }

    /// Delete a track; its open events cascade with it
    #[instrument(skip(self))]
    pub async fn delete_track(&self, id: TrackingId) -> ServiceResult<()> {
        if self.ctx.track_repo().find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Track", id.to_string()));
        }

        self.ctx.track_repo().delete(id).await?;

        info!(track_id = %id, "Track deleted");

        Ok(())
    }

    /// All open events for a track, newest first, with computed genuine flags
    #[instrument(skip(self))]
    pub async fn list_opens(&self, id: TrackingId) -> ServiceResult<Vec<OpenEventResponse>> {
        let track = self
            .ctx
            .track_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Track", id.to_string()))?;

        let opens = self.ctx.open_repo().find_by_track(id).await?;
        let window = self.ctx.suppression_window();

        Ok(opens
            .iter()
            .map(|open| {
                OpenEventResponse::from(OpenWithContext {
                    open,
                    track_created_at: track.created_at,
                    window,
                })
            })
            .collect())
    }
}

/// Trimmed value, None when blank
fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_trims_and_drops_blank() {
        assert_eq!(
            normalized(Some("  alice@example.com ".to_string())),
            Some("alice@example.com".to_string())
        );
        assert_eq!(normalized(Some("   ".to_string())), None);
        assert_eq!(normalized(Some(String::new())), None);
        assert_eq!(normalized(None), None);
    }
}
