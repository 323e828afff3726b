//! Pure analytics helpers shared by the aggregation services

mod engagement;
mod recipients;

pub use engagement::{engagement_score, EngagementInput};
pub use recipients::split_addresses;
