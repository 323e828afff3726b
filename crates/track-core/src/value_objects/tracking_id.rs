//! Tracking ID - opaque identifier for a tracked message
//!
//! A random UUIDv4 wrapped in a newtype. The value carries no information
//! about the recipient or subject, so a pixel URL cannot be reversed into
//! anything and ids cannot be enumerated.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Opaque tracked-message identifier (UUIDv4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TrackingId(Uuid);

impl TrackingId {
    /// Create from an existing UUID
    #[inline]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    #[inline]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Borrow the inner UUID
    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Check if the id is the nil UUID (uninitialized)
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parse from the canonical hyphenated string representation
    pub fn parse(s: &str) -> Result<Self, TrackingIdParseError> {
        Uuid::parse_str(s)
            .map(TrackingId)
            .map_err(|_| TrackingIdParseError::InvalidFormat)
    }
}

/// Error when parsing a TrackingId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrackingIdParseError {
    #[error("invalid tracking id format")]
    InvalidFormat,
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TrackingId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<TrackingId> for Uuid {
    fn from(id: TrackingId) -> Self {
        id.0
    }
}

impl std::str::FromStr for TrackingId {
    type Err = TrackingIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackingId::parse(s)
    }
}

// Serialize as the canonical hyphenated string
impl Serialize for TrackingId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TrackingId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TrackingId::parse(&s).map_err(serde::de::Error::custom)
    }
}
