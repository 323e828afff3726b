//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::TrackingId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Track not found: {0}")]
    TrackNotFound(TrackingId),

    #[error("Open event not found: {0}")]
    OpenEventNotFound(i64),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid tracking id: {0}")]
    InvalidTrackingId(String),

    #[error("{field} too long: max {max} characters")]
    ContentTooLong { field: &'static str, max: usize },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::TrackNotFound(_) => "UNKNOWN_TRACK",
            Self::OpenEventNotFound(_) => "UNKNOWN_OPEN_EVENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidTrackingId(_) => "INVALID_TRACKING_ID",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TrackNotFound(_) | Self::OpenEventNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidTrackingId(_) | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is a storage failure (surfaces as 503 upstream)
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }
}
