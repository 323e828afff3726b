//! Value objects - immutable types that represent domain concepts

mod proxy;
mod tracking_id;

pub use proxy::{
    ProxyKind, ProxyRangeError, ProxyRanges, DEFAULT_APPLE_RANGES, DEFAULT_GOOGLE_RANGES,
};
pub use tracking_id::{TrackingId, TrackingIdParseError};
