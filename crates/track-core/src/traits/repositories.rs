//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. The suppression window travels through the
//! aggregate queries as a parameter so that genuineness stays a query-time
//! computation over fully stored rows.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::entities::{NewOpenEvent, OpenEvent, RecipientRollup, TrackOpenSummary, TrackedMessage};
use crate::error::DomainError;
use crate::value_objects::TrackingId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Filter options for track listings
#[derive(Debug, Clone, Default)]
pub struct TrackFilter {
    /// Some(true): at least one stored open; Some(false): none at all
    pub opened: Option<bool>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    /// Case-insensitive substring over recipient, subject, and notes
    pub search: Option<String>,
    /// Maximum rows to return; 0 means the repository default
    pub limit: i64,
}

/// One hour-of-day histogram bucket (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourBucket {
    /// 0-23
    pub hour: i32,
    pub count: i64,
}

/// One day-of-week histogram bucket (UTC, 0 = Sunday)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayBucket {
    /// 0-6, Sunday first
    pub weekday: i32,
    pub count: i64,
}

// ============================================================================
// Track Repository
// ============================================================================

#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// Persist a new tracked message
    async fn create(&self, track: &TrackedMessage) -> RepoResult<()>;

    /// Find a track by id
    async fn find_by_id(&self, id: TrackingId) -> RepoResult<Option<TrackedMessage>>;

    /// List tracks with open-count aggregates, pinned first then newest first
    async fn list(
        &self,
        filter: &TrackFilter,
        suppression: Duration,
    ) -> RepoResult<Vec<TrackOpenSummary>>;

    /// Fetch one track with its open-count aggregates
    async fn summarize(
        &self,
        id: TrackingId,
        suppression: Duration,
    ) -> RepoResult<Option<TrackOpenSummary>>;

    /// Update mutable fields (pinned, notes)
    async fn update(&self, track: &TrackedMessage) -> RepoResult<()>;

    /// Delete a track; open events go with it (cascade)
    async fn delete(&self, id: TrackingId) -> RepoResult<()>;

    /// Total number of tracked messages
    async fn count(&self) -> RepoResult<i64>;

    /// Per-track genuine-open projection for recipient aggregation
    async fn recipient_rollups(&self, suppression: Duration) -> RepoResult<Vec<RecipientRollup>>;

    /// Tracks with a genuine open and no first-open notification yet
    async fn find_first_open_pending(
        &self,
        suppression: Duration,
    ) -> RepoResult<Vec<TrackedMessage>>;

    /// Tracks old enough for a follow-up reminder, no genuine open, not
    /// reminded before
    async fn find_follow_up_pending(
        &self,
        suppression: Duration,
        min_age: Duration,
    ) -> RepoResult<Vec<TrackedMessage>>;

    /// Record that the first-open notification went out
    async fn mark_first_open_notified(
        &self,
        id: TrackingId,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Record that the follow-up reminder went out
    async fn mark_follow_up_notified(&self, id: TrackingId, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Open Event Repository
// ============================================================================

#[async_trait]
pub trait OpenEventRepository: Send + Sync {
    /// Insert an open event and return the stored row
    async fn record(&self, event: &NewOpenEvent) -> RepoResult<OpenEvent>;

    /// All open events for a track, newest first
    async fn find_by_track(&self, track_id: TrackingId) -> RepoResult<Vec<OpenEvent>>;

    /// Earliest genuine open for a track, if any
    async fn first_genuine_open(
        &self,
        track_id: TrackingId,
        suppression: Duration,
    ) -> RepoResult<Option<OpenEvent>>;

    /// Total stored opens across all tracks
    async fn count(&self) -> RepoResult<i64>;

    /// Genuine opens across all tracks
    async fn count_genuine(&self, suppression: Duration) -> RepoResult<i64>;

    /// Tracks with at least one stored open of any kind
    async fn count_tracks_with_opens(&self) -> RepoResult<i64>;

    /// Tracks with at least one genuine open
    async fn count_tracks_with_genuine_opens(&self, suppression: Duration) -> RepoResult<i64>;

    /// Genuine opens grouped by UTC hour of day; empty hours are absent
    async fn genuine_opens_by_hour(&self, suppression: Duration) -> RepoResult<Vec<HourBucket>>;

    /// Genuine opens grouped by UTC day of week; empty days are absent
    async fn genuine_opens_by_weekday(
        &self,
        suppression: Duration,
    ) -> RepoResult<Vec<WeekdayBucket>>;
}
