//! Tracked message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for tracked_messages table
#[derive(Debug, Clone, FromRow)]
pub struct TrackModel {
    pub id: Uuid,
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
    pub message_group_id: Option<String>,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub first_open_notified_at: Option<DateTime<Utc>>,
    pub follow_up_notified_at: Option<DateTime<Utc>>,
}

/// Track row joined with its open-count aggregates
#[derive(Debug, Clone, FromRow)]
pub struct TrackSummaryModel {
    pub id: Uuid,
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
    pub message_group_id: Option<String>,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub first_open_notified_at: Option<DateTime<Utc>>,
    pub follow_up_notified_at: Option<DateTime<Utc>>,
    pub total_opens: i64,
    pub genuine_opens: i64,
    pub first_open_at: Option<DateTime<Utc>>,
    pub last_open_at: Option<DateTime<Utc>>,
}

impl TrackSummaryModel {
    /// Check if any open at all has been stored
    #[inline]
    pub fn has_opens(&self) -> bool {
        self.total_opens > 0
    }
}

/// Per-track projection used for recipient engagement aggregation
#[derive(Debug, Clone, FromRow)]
pub struct RecipientRollupModel {
    pub recipient: Option<String>,
    pub created_at: DateTime<Utc>,
    pub genuine_opens: i64,
    pub last_genuine_open_at: Option<DateTime<Utc>>,
}
