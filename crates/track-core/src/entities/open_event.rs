//! Open event entity - one pixel fetch for a tracked message

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::{ProxyKind, TrackingId};

/// Open event entity
///
/// Every pixel fetch is stored, including proxy prefetches and fetches
/// inside the suppression window. Genuineness is derived, never a reason
/// to drop a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenEvent {
    pub id: i64,
    pub tracked_message_id: TrackingId,
    pub opened_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    /// Image-proxy attribution computed at insert time
    pub proxy: Option<ProxyKind>,
}

impl OpenEvent {
    /// A genuine open is neither proxy-attributed nor inside the
    /// suppression window following registration
    pub fn is_genuine(&self, track_created_at: DateTime<Utc>, window: Duration) -> bool {
        self.proxy.is_none() && self.opened_at >= track_created_at + window
    }

    /// "City, Country" when both are known, either alone otherwise
    pub fn location(&self) -> Option<String> {
        match (self.city.as_deref(), self.country.as_deref()) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(country)) => Some(country.to_string()),
            (None, None) => None,
        }
    }
}

/// Payload for recording a new open event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOpenEvent {
    pub tracked_message_id: TrackingId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub proxy: Option<ProxyKind>,
}

impl NewOpenEvent {
    /// Bare event with only the track reference set
    pub fn for_track(tracked_message_id: TrackingId) -> Self {
        Self {
            tracked_message_id,
            ip_address: None,
            user_agent: None,
            referer: None,
            country: None,
            city: None,
            proxy: None,
        }
    }
}
