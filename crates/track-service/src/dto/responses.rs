//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Tracking ids are
//! serialized as UUID strings.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Track Responses
// ============================================================================

/// Freshly registered track, returned from POST with the embeddable pixel
#[derive(Debug, Clone, Serialize)]
pub struct TrackResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_group_id: Option<String>,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    /// Absolute pixel URL built from the configured base URL
    pub pixel_url: String,
    /// Ready-to-paste HTML snippet embedding the pixel
    pub html_snippet: String,
}

/// Track with its open-count aggregates, used in listings and detail views
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummaryResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_group_id: Option<String>,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub pixel_url: String,
    /// Every stored open, proxy prefetches included
    pub open_count: i64,
    /// Opens outside the suppression window and not proxy-attributed
    pub genuine_open_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_open_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_open_at: Option<DateTime<Utc>>,
    /// Whether the message was genuinely read
    pub opened: bool,
}

// ============================================================================
// Open Event Responses
// ============================================================================

/// One recorded pixel fetch
#[derive(Debug, Clone, Serialize)]
pub struct OpenEventResponse {
    pub id: i64,
    pub opened_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// "City, Country" when both are known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Image-proxy attribution ("apple", "google"), absent for direct fetches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Computed against the owning track and the suppression window
    pub genuine: bool,
}

// ============================================================================
// Analytics Responses
// ============================================================================

/// Global statistics across every track
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_tracks: i64,
    pub total_opens: i64,
    pub genuine_opens: i64,
    /// Tracks with at least one stored open of any kind
    pub tracks_with_opens: i64,
    pub tracks_with_genuine_opens: i64,
    /// tracks_with_genuine_opens / total_tracks; 0.0 when nothing is tracked
    pub open_rate: f64,
    /// Genuine opens per UTC hour of day, 24 buckets
    pub opens_by_hour: Vec<i64>,
    /// Genuine opens per UTC day of week, 7 buckets, Sunday first
    pub opens_by_weekday: Vec<i64>,
}

/// Per-recipient engagement aggregate
#[derive(Debug, Clone, Serialize)]
pub struct RecipientEngagementResponse {
    /// Normalized address (trimmed, lowercased)
    pub recipient: String,
    pub tracks_sent: u64,
    /// Of those, how many have at least one genuine open
    pub tracks_opened: u64,
    pub genuine_opens: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_open_at: Option<DateTime<Utc>>,
    /// Composite score in [0, 100]
    pub engagement_score: f64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
