//! Tracked message entity - one registered outgoing email

use chrono::{DateTime, Duration, Utc};

use crate::analytics::split_addresses;
use crate::value_objects::TrackingId;

/// Tracked message entity
///
/// Registered by the operator before sending an email; the id becomes part
/// of the pixel URL embedded in the message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMessage {
    pub id: TrackingId,
    /// Free text; may hold a comma-separated address list
    pub recipient: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
    /// External grouping id (e.g. a send batch)
    pub message_group_id: Option<String>,
    /// Pinned tracks sort first in listings
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    /// Set once the first-open notification has been sent
    pub first_open_notified_at: Option<DateTime<Utc>>,
    /// Set once the unopened follow-up reminder has been sent
    pub follow_up_notified_at: Option<DateTime<Utc>>,
}

impl TrackedMessage {
    /// Create a new TrackedMessage with a fresh random id
    pub fn new(
        recipient: Option<String>,
        subject: Option<String>,
        notes: Option<String>,
        message_group_id: Option<String>,
    ) -> Self {
        Self {
            id: TrackingId::generate(),
            recipient,
            subject,
            notes,
            message_group_id,
            pinned: false,
            created_at: Utc::now(),
            first_open_notified_at: None,
            follow_up_notified_at: None,
        }
    }

    /// Relative pixel path for this track
    pub fn pixel_path(&self) -> String {
        format!("/p/{}.gif", self.id)
    }

    /// Opens recorded before this instant are assumed to be the sender's
    /// own client fetching the pixel
    pub fn suppression_cutoff(&self, window: Duration) -> DateTime<Utc> {
        self.created_at + window
    }

    /// Individual addresses from the recipient field (trimmed, lowercased)
    pub fn recipient_addresses(&self) -> Vec<String> {
        self.recipient
            .as_deref()
            .map(split_addresses)
            .unwrap_or_default()
    }

    /// Check whether the track is old enough for a follow-up reminder
    pub fn is_stale(&self, now: DateTime<Utc>, min_age: Duration) -> bool {
        now - self.created_at >= min_age
    }
}

/// A tracked message together with its open-count aggregates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOpenSummary {
    pub track: TrackedMessage,
    /// Every stored open, proxy prefetches and suppressed rows included
    pub total_opens: i64,
    /// Opens outside the suppression window and not proxy-attributed
    pub genuine_opens: i64,
    pub first_open_at: Option<DateTime<Utc>>,
    pub last_open_at: Option<DateTime<Utc>>,
}

impl TrackOpenSummary {
    /// Check whether any open at all has been recorded
    #[inline]
    pub fn has_opens(&self) -> bool {
        self.total_opens > 0
    }

    /// Check whether the message was genuinely read
    #[inline]
    pub fn is_opened(&self) -> bool {
        self.genuine_opens > 0
    }
}

/// Per-track projection used for recipient engagement aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientRollup {
    pub recipient: Option<String>,
    pub created_at: DateTime<Utc>,
    pub genuine_opens: i64,
    pub last_genuine_open_at: Option<DateTime<Utc>>,
}
