//! # track-core
//!
//! Domain layer containing entities, value objects, repository traits, and
//! the pure classification/scoring logic. This crate has zero dependencies
//! on infrastructure (database, web framework, etc.).

pub mod analytics;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use analytics::{engagement_score, split_addresses, EngagementInput};
pub use entities::{NewOpenEvent, OpenEvent, RecipientRollup, TrackOpenSummary, TrackedMessage};
pub use error::DomainError;
pub use traits::{
    HourBucket, OpenEventRepository, RepoResult, TrackFilter, TrackRepository, WeekdayBucket,
};
pub use value_objects::{
    ProxyKind, ProxyRangeError, ProxyRanges, TrackingId, TrackingIdParseError,
    DEFAULT_APPLE_RANGES, DEFAULT_GOOGLE_RANGES,
};
