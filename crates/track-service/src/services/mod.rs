//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod error;
pub mod notify;
pub mod open;
pub mod stats;
pub mod track;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use notify::{NotifyService, ScanOutcome};
pub use open::OpenService;
pub use stats::StatsService;
pub use track::TrackService;
