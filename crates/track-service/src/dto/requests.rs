//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Track Requests
// ============================================================================

/// Register a new tracked message
///
/// Every field is optional; a bare `{}` registers an anonymous track whose
/// pixel still works.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTrackRequest {
    /// Free text, may hold a comma-separated address list
    #[validate(length(max = 255, message = "Recipient must be at most 255 characters"))]
    pub recipient: Option<String>,

    #[validate(length(max = 500, message = "Subject must be at most 500 characters"))]
    pub subject: Option<String>,

    #[validate(length(max = 10000, message = "Notes must be at most 10000 characters"))]
    pub notes: Option<String>,

    /// External grouping id (e.g. a send batch)
    #[validate(length(max = 64, message = "Message group id must be at most 64 characters"))]
    pub message_group_id: Option<String>,
}

/// Update a tracked message
///
/// Absent fields are left unchanged; `notes` set to an empty string clears
/// the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTrackRequest {
    pub pinned: Option<bool>,

    #[validate(length(max = 10000, message = "Notes must be at most 10000 characters"))]
    pub notes: Option<String>,
}

/// Query parameters for the track listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTracksQuery {
    /// true: at least one stored open; false: none at all
    pub opened: Option<bool>,

    /// RFC 3339 lower bound on registration time
    pub created_after: Option<DateTime<Utc>>,

    /// RFC 3339 upper bound on registration time
    pub created_before: Option<DateTime<Utc>>,

    /// Case-insensitive substring over recipient, subject, and notes
    pub q: Option<String>,

    /// Page size; default 100, capped at 500
    pub limit: Option<i64>,
}
