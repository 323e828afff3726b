mod maxmind;

pub use maxmind::{GeoError, GeoLocation, GeoResolver, GeoResult, SharedGeoResolver};
