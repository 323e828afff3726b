//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.
//! Pixel URLs and genuineness are not stored on the entities, so the
//! conversions take small context structs carrying what the computation
//! needs.

use chrono::{DateTime, Duration, Utc};
use track_common::TrackingConfig;
use track_core::entities::{OpenEvent, TrackOpenSummary, TrackedMessage};

use super::responses::{OpenEventResponse, TrackResponse, TrackSummaryResponse};

// ============================================================================
// Track Mappers
// ============================================================================

/// A track paired with the tracking configuration its URLs come from
pub struct TrackWithConfig<'a> {
    pub track: &'a TrackedMessage,
    pub tracking: &'a TrackingConfig,
}

impl From<TrackWithConfig<'_>> for TrackResponse {
    fn from(ctx: TrackWithConfig<'_>) -> Self {
        let track = ctx.track;
        Self {
            id: track.id.to_string(),
            recipient: track.recipient.clone(),
            subject: track.subject.clone(),
            notes: track.notes.clone(),
            message_group_id: track.message_group_id.clone(),
            pinned: track.pinned,
            created_at: track.created_at,
            pixel_url: ctx.tracking.pixel_url(track.id),
            html_snippet: ctx.tracking.html_snippet(track.id),
        }
    }
}

/// An aggregated summary paired with the tracking configuration
pub struct SummaryWithConfig<'a> {
    pub summary: TrackOpenSummary,
    pub tracking: &'a TrackingConfig,
}

impl From<SummaryWithConfig<'_>> for TrackSummaryResponse {
    fn from(ctx: SummaryWithConfig<'_>) -> Self {
        let opened = ctx.summary.is_opened();
        let pixel_url = ctx.tracking.pixel_url(ctx.summary.track.id);
        let track = ctx.summary.track;
        Self {
            id: track.id.to_string(),
            recipient: track.recipient,
            subject: track.subject,
            notes: track.notes,
            message_group_id: track.message_group_id,
            pinned: track.pinned,
            created_at: track.created_at,
            pixel_url,
            open_count: ctx.summary.total_opens,
            genuine_open_count: ctx.summary.genuine_opens,
            first_open_at: ctx.summary.first_open_at,
            last_open_at: ctx.summary.last_open_at,
            opened,
        }
    }
}

// ============================================================================
// Open Event Mappers
// ============================================================================

/// An open event paired with what genuineness is computed against
pub struct OpenWithContext<'a> {
    pub open: &'a OpenEvent,
    pub track_created_at: DateTime<Utc>,
    pub window: Duration,
}

impl From<OpenWithContext<'_>> for OpenEventResponse {
    fn from(ctx: OpenWithContext<'_>) -> Self {
        let open = ctx.open;
        Self {
            id: open.id,
            opened_at: open.opened_at,
            ip_address: open.ip_address.clone(),
            user_agent: open.user_agent.clone(),
            referer: open.referer.clone(),
            country: open.country.clone(),
            city: open.city.clone(),
            location: open.location(),
            proxy: open.proxy.map(|p| p.as_str().to_string()),
            genuine: open.is_genuine(ctx.track_created_at, ctx.window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_core::value_objects::{ProxyKind, ProxyRanges, TrackingId};

    fn tracking() -> TrackingConfig {
        TrackingConfig {
            base_url: "https://track.example.com".to_string(),
            suppression_window_secs: 5,
            proxy_ranges: ProxyRanges::default(),
        }
    }

    fn open(track_id: TrackingId, opened_at: DateTime<Utc>, proxy: Option<ProxyKind>) -> OpenEvent {
        OpenEvent {
            id: 1,
            tracked_message_id: track_id,
            opened_at,
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            referer: None,
            country: Some("Germany".to_string()),
            city: Some("Berlin".to_string()),
            proxy,
        }
    }

    #[test]
    fn test_track_response_carries_pixel_url() {
        let track = TrackedMessage::new(Some("alice@example.com".to_string()), None, None, None);
        let config = tracking();

        let response = TrackResponse::from(TrackWithConfig {
            track: &track,
            tracking: &config,
        });

        assert_eq!(response.id, track.id.to_string());
        assert_eq!(
            response.pixel_url,
            format!("https://track.example.com/p/{}.gif", track.id)
        );
        assert!(response.html_snippet.contains(&response.pixel_url));
    }

    #[test]
    fn test_summary_response_opened_flag() {
        let track = TrackedMessage::new(None, None, None, None);
        let config = tracking();

        let summary = TrackOpenSummary {
            track: track.clone(),
            total_opens: 4,
            genuine_opens: 0,
            first_open_at: Some(Utc::now()),
            last_open_at: Some(Utc::now()),
        };
        let response = TrackSummaryResponse::from(SummaryWithConfig {
            summary,
            tracking: &config,
        });
        assert_eq!(response.open_count, 4);
        assert_eq!(response.genuine_open_count, 0);
        assert!(!response.opened);

        let summary = TrackOpenSummary {
            track,
            total_opens: 4,
            genuine_opens: 2,
            first_open_at: Some(Utc::now()),
            last_open_at: Some(Utc::now()),
        };
        let response = TrackSummaryResponse::from(SummaryWithConfig {
            summary,
            tracking: &config,
        });
        assert!(response.opened);
    }

    #[test]
    fn test_open_response_genuine_flag() {
        let track_id = TrackingId::generate();
        let created = Utc::now();
        let window = Duration::seconds(5);

        let direct = open(track_id, created + Duration::minutes(10), None);
        let response = OpenEventResponse::from(OpenWithContext {
            open: &direct,
            track_created_at: created,
            window,
        });
        assert!(response.genuine);
        assert_eq!(response.proxy, None);
        assert_eq!(response.location.as_deref(), Some("Berlin, Germany"));

        let suppressed = open(track_id, created + Duration::seconds(2), None);
        let response = OpenEventResponse::from(OpenWithContext {
            open: &suppressed,
            track_created_at: created,
            window,
        });
        assert!(!response.genuine);

        let proxied = open(track_id, created + Duration::minutes(10), Some(ProxyKind::Google));
        let response = OpenEventResponse::from(OpenWithContext {
            open: &proxied,
            track_created_at: created,
            window,
        });
        assert!(!response.genuine);
        assert_eq!(response.proxy.as_deref(), Some("google"));
    }
}
