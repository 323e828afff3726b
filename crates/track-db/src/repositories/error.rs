//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use track_core::error::DomainError;
use track_core::value_objects::TrackingId;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for foreign key violation and return appropriate error or fallback
pub fn map_fk_violation<F>(e: SqlxError, on_fk: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_fk();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "track not found" error
pub fn track_not_found(id: TrackingId) -> DomainError {
    DomainError::TrackNotFound(id)
}
