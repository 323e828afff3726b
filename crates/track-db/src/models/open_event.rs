//! Open event database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for open_events table
#[derive(Debug, Clone, FromRow)]
pub struct OpenEventModel {
    pub id: i64,
    pub tracked_message_id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    /// Stored category string ("apple" / "google"), NULL for direct fetches
    pub proxy: Option<String>,
}

impl OpenEventModel {
    /// Check if the open came through a known image proxy
    #[inline]
    pub fn is_proxied(&self) -> bool {
        self.proxy.is_some()
    }
}

/// One hour-of-day histogram row
#[derive(Debug, Clone, FromRow)]
pub struct HourBucketModel {
    pub hour: i32,
    pub count: i64,
}

/// One day-of-week histogram row
#[derive(Debug, Clone, FromRow)]
pub struct WeekdayBucketModel {
    pub weekday: i32,
    pub count: i64,
}
