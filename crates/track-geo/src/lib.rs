//! # track-geo
//!
//! GeoIP enrichment for open events via a local MaxMind GeoLite2-City file.
//!
//! ## Features
//!
//! - **Optional database**: no file configured means lookups are disabled,
//!   not broken
//! - **Graceful degradation**: unknown addresses and private ranges resolve
//!   to an unknown location instead of an error
//!
//! ## Example
//!
//! ```ignore
//! use track_geo::GeoResolver;
//!
//! let resolver = GeoResolver::from_config(&config.geoip);
//! let location = resolver.lookup("203.0.113.7".parse()?);
//! println!("{:?} {:?}", location.country, location.city);
//! ```

pub mod resolver;

// Re-export resolver types
pub use resolver::{GeoError, GeoLocation, GeoResolver, GeoResult, SharedGeoResolver};
