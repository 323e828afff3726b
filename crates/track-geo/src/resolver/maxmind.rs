//! MaxMind GeoLite2-City reader wrapper.
//!
//! The database file is optional. When it is missing or unreadable the
//! resolver degrades to a no-op and every lookup reports an unknown
//! location; open events are still recorded either way.

use maxminddb::{geoip2, MaxMindDBError, Reader};
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

/// Error type for GeoIP resolver operations
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Failed to open GeoIP database: {0}")]
    OpenDatabase(#[from] MaxMindDBError),
}

/// Result type for GeoIP resolver operations
pub type GeoResult<T> = Result<T, GeoError>;

/// Country and city derived from an IP address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub city: Option<String>,
}

impl GeoLocation {
    /// Location with neither country nor city known
    pub const fn unknown() -> Self {
        Self { country: None, city: None }
    }

    pub fn is_unknown(&self) -> bool {
        self.country.is_none() && self.city.is_none()
    }
}

/// GeoLite2-City lookups with graceful degradation
pub struct GeoResolver {
    reader: Option<Reader<Vec<u8>>>,
}

impl std::fmt::Debug for GeoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoResolver")
            .field("enabled", &self.reader.is_some())
            .finish()
    }
}

impl GeoResolver {
    /// Open a GeoLite2-City database file
    pub fn open(path: &Path) -> GeoResult<Self> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self { reader: Some(reader) })
    }

    /// Resolver that reports every location as unknown
    pub fn disabled() -> Self {
        Self { reader: None }
    }

    /// Build from configuration; open failures disable lookups instead of
    /// failing startup
    pub fn from_config(config: &track_common::GeoIpConfig) -> Self {
        let Some(path) = config.db_path.as_deref() else {
            tracing::info!("GeoIP database not configured, location lookups disabled");
            return Self::disabled();
        };

        match Self::open(Path::new(path)) {
            Ok(resolver) => {
                tracing::info!(path = %path, "GeoIP database loaded");
                resolver
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to open GeoIP database, location lookups disabled");
                Self::disabled()
            }
        }
    }

    /// Check whether a database is loaded
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.reader.is_some()
    }

    /// Look up country and city for an IP address
    ///
    /// Private and reserved addresses are skipped; addresses the database
    /// does not cover resolve to an unknown location. This never fails.
    pub fn lookup(&self, ip: IpAddr) -> GeoLocation {
        let Some(reader) = &self.reader else {
            return GeoLocation::unknown();
        };

        if is_private_or_reserved(ip) {
            return GeoLocation::unknown();
        }

        match reader.lookup::<geoip2::City>(ip) {
            Ok(city) => GeoLocation {
                country: city
                    .country
                    .as_ref()
                    .and_then(|c| c.names.as_ref())
                    .and_then(|names| names.get("en"))
                    .map(|name| (*name).to_string()),
                city: city
                    .city
                    .as_ref()
                    .and_then(|c| c.names.as_ref())
                    .and_then(|names| names.get("en"))
                    .map(|name| (*name).to_string()),
            },
            Err(MaxMindDBError::AddressNotFoundError(_)) => GeoLocation::unknown(),
            Err(e) => {
                tracing::debug!(ip = %ip, error = %e, "GeoIP lookup failed");
                GeoLocation::unknown()
            }
        }
    }
}

/// Check whether an address can never appear in a public GeoIP database
fn is_private_or_reserved(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local
                || (segments[0] & 0xfe00) == 0xfc00
                // fe80::/10 link local
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Shared resolver wrapped in Arc for easy cloning
pub type SharedGeoResolver = Arc<GeoResolver>;
