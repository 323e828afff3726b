//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Track registration request
#[derive(Debug, Default, Serialize)]
pub struct CreateTrackRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_group_id: Option<String>,
}

impl CreateTrackRequest {
    /// A track addressed to a recipient nobody else uses
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            recipient: Some(format!("recipient{suffix}@example.com")),
            subject: Some(format!("Test subject {suffix}")),
            notes: Some("Created by integration tests".to_string()),
            message_group_id: None,
        }
    }

    /// Same shape, explicit recipient
    pub fn for_recipient(recipient: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            recipient: Some(recipient.to_string()),
            subject: Some(format!("Test subject {suffix}")),
            notes: None,
            message_group_id: None,
        }
    }

    /// A recipient address unique to this test run
    pub fn unique_recipient(prefix: &str) -> String {
        format!("{prefix}{}@example.com", unique_suffix())
    }
}

/// Track update request
#[derive(Debug, Default, Serialize)]
pub struct UpdateTrackRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Freshly registered track (POST /api/tracks response)
#[derive(Debug, Deserialize)]
pub struct TrackResponse {
    pub id: String,
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
    pub message_group_id: Option<String>,
    pub pinned: bool,
    pub created_at: String,
    pub pixel_url: String,
    pub html_snippet: String,
}

/// Track with open aggregates (list and detail responses)
#[derive(Debug, Deserialize)]
pub struct TrackSummaryResponse {
    pub id: String,
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
    pub message_group_id: Option<String>,
    pub pinned: bool,
    pub created_at: String,
    pub pixel_url: String,
    pub open_count: i64,
    pub genuine_open_count: i64,
    pub first_open_at: Option<String>,
    pub last_open_at: Option<String>,
    pub opened: bool,
}

/// One recorded pixel fetch (GET /api/tracks/{id}/opens)
#[derive(Debug, Deserialize)]
pub struct OpenEventResponse {
    pub id: i64,
    pub opened_at: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub proxy: Option<String>,
    pub genuine: bool,
}

/// Global statistics (GET /api/stats)
#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    pub total_tracks: i64,
    pub total_opens: i64,
    pub genuine_opens: i64,
    pub tracks_with_opens: i64,
    pub tracks_with_genuine_opens: i64,
    pub open_rate: f64,
    pub opens_by_hour: Vec<i64>,
    pub opens_by_weekday: Vec<i64>,
}

/// Per-recipient engagement (GET /api/recipients)
#[derive(Debug, Deserialize)]
pub struct RecipientEngagementResponse {
    pub recipient: String,
    pub tracks_sent: u64,
    pub tracks_opened: u64,
    pub genuine_opens: u64,
    pub last_open_at: Option<String>,
    pub engagement_score: f64,
}

/// Error envelope every failed API call returns
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail inside the envelope
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
