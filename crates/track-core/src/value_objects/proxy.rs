//! Proxy classification - mail-provider image-proxy detection
//!
//! Gmail and Apple Mail fetch remote images through their own proxy fleets,
//! often before a human ever looks at the email. Opens attributed to those
//! fleets are stored like any other but excluded from genuine-open counts.

use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Apple Mail Privacy Protection egress ranges
pub const DEFAULT_APPLE_RANGES: &[&str] = &[
    "17.0.0.0/8",    // Apple's primary range
    "104.28.0.0/16", // Cloudflare (used by Apple)
];

/// Gmail image proxy egress ranges
pub const DEFAULT_GOOGLE_RANGES: &[&str] = &[
    "66.102.0.0/20",   // Google
    "66.249.64.0/19",  // Googlebot
    "72.14.192.0/18",  // Google
    "74.125.0.0/16",   // Google (includes image proxy)
    "209.85.128.0/17", // Google
];

/// Known image-proxy operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    Apple,
    Google,
}

impl ProxyKind {
    /// Stable lowercase name, also the stored column value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Google => "google",
        }
    }

    /// Parse the stored column value back into the enum
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "apple" => Some(Self::Apple),
            "google" => Some(Self::Google),
            _ => None,
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when building [`ProxyRanges`] from configured CIDR strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyRangeError {
    #[error("invalid CIDR range: {0}")]
    InvalidCidr(String),
}

/// The CIDR range lists a classification runs against
///
/// Defaults cover the currently published Apple/Google fleets; deployments
/// override them through configuration when the providers shuffle ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRanges {
    apple: Vec<IpNet>,
    google: Vec<IpNet>,
}

impl ProxyRanges {
    /// Build from externally supplied CIDR strings
    pub fn from_cidrs(apple: &[String], google: &[String]) -> Result<Self, ProxyRangeError> {
        Ok(Self {
            apple: parse_cidrs(apple)?,
            google: parse_cidrs(google)?,
        })
    }

    /// Classify a request against the ranges, then user-agent heuristics
    ///
    /// IP ranges are authoritative; the user-agent fallback catches proxies
    /// egressing from ranges we do not know about yet.
    pub fn classify(&self, ip: Option<IpAddr>, user_agent: Option<&str>) -> Option<ProxyKind> {
        if let Some(ip) = ip {
            if self.apple.iter().any(|net| net.contains(&ip)) {
                return Some(ProxyKind::Apple);
            }
            if self.google.iter().any(|net| net.contains(&ip)) {
                return Some(ProxyKind::Google);
            }
        }

        if let Some(ua) = user_agent {
            let ua = ua.to_lowercase();
            if ua.contains("googleimageproxy") || ua.contains("ggpht.com") {
                return Some(ProxyKind::Google);
            }
            if ua.contains("apple") && ua.contains("mail") {
                return Some(ProxyKind::Apple);
            }
        }

        None
    }

    /// Number of configured ranges (apple + google)
    pub fn len(&self) -> usize {
        self.apple.len() + self.google.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apple.is_empty() && self.google.is_empty()
    }
}

impl Default for ProxyRanges {
    fn default() -> Self {
        // The built-in lists are valid literals; anything that fails to
        // parse is dropped rather than taking the service down.
        Self {
            apple: DEFAULT_APPLE_RANGES.iter().filter_map(|s| s.parse().ok()).collect(),
            google: DEFAULT_GOOGLE_RANGES.iter().filter_map(|s| s.parse().ok()).collect(),
        }
    }
}

fn parse_cidrs(raw: &[String]) -> Result<Vec<IpNet>, ProxyRangeError> {
    raw.iter()
        .map(|s| {
            s.trim()
                .parse::<IpNet>()
                .map_err(|_| ProxyRangeError::InvalidCidr(s.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Option<IpAddr> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_default_ranges_parse() {
        let ranges = ProxyRanges::default();
        assert_eq!(
            ranges.len(),
            DEFAULT_APPLE_RANGES.len() + DEFAULT_GOOGLE_RANGES.len()
        );
    }

    #[test]
    fn test_apple_range_detected() {
        let ranges = ProxyRanges::default();
        assert_eq!(ranges.classify(ip("17.1.2.3"), None), Some(ProxyKind::Apple));
        assert_eq!(
            ranges.classify(ip("104.28.0.99"), None),
            Some(ProxyKind::Apple)
        );
    }

    #[test]
    fn test_google_range_detected() {
        let ranges = ProxyRanges::default();
        assert_eq!(
            ranges.classify(ip("66.249.80.1"), None),
            Some(ProxyKind::Google)
        );
        assert_eq!(
            ranges.classify(ip("74.125.200.10"), None),
            Some(ProxyKind::Google)
        );
    }

    #[test]
    fn test_ordinary_ip_is_not_a_proxy() {
        let ranges = ProxyRanges::default();
        assert_eq!(ranges.classify(ip("203.0.113.7"), Some("Mozilla/5.0")), None);
        assert_eq!(ranges.classify(ip("192.168.1.1"), None), None);
    }

    #[test]
    fn test_user_agent_heuristics() {
        let ranges = ProxyRanges::default();
        assert_eq!(
            ranges.classify(ip("203.0.113.7"), Some("Mozilla/5.0 (via GoogleImageProxy)")),
            Some(ProxyKind::Google)
        );
        assert_eq!(
            ranges.classify(None, Some("images via ggpht.com")),
            Some(ProxyKind::Google)
        );
        assert_eq!(
            ranges.classify(ip("203.0.113.7"), Some("Mozilla/5.0 AppleMail/16.0")),
            Some(ProxyKind::Apple)
        );
        // "apple" without "mail" is not enough
        assert_eq!(
            ranges.classify(ip("203.0.113.7"), Some("AppleWebKit/605.1.15 Safari")),
            None
        );
    }

    #[test]
    fn test_ip_range_wins_over_user_agent() {
        let ranges = ProxyRanges::default();
        // A Google UA from an Apple range classifies as apple
        assert_eq!(
            ranges.classify(ip("17.9.9.9"), Some("GoogleImageProxy")),
            Some(ProxyKind::Apple)
        );
    }

    #[test]
    fn test_ipv6_classifies_via_user_agent_only() {
        let ranges = ProxyRanges::default();
        assert_eq!(
            ranges.classify(ip("2001:db8::1"), Some("Mail/3696 CFNetwork Apple")),
            Some(ProxyKind::Apple)
        );
    }

    #[test]
    fn test_from_cidrs_override() {
        let ranges = ProxyRanges::from_cidrs(
            &["10.0.0.0/8".to_string()],
            &["2001:db8::/32".to_string()],
        )
        .unwrap();
        assert_eq!(ranges.classify(ip("10.1.2.3"), None), Some(ProxyKind::Apple));
        assert_eq!(
            ranges.classify(ip("2001:db8::42"), None),
            Some(ProxyKind::Google)
        );
        // Defaults no longer apply once overridden
        assert_eq!(ranges.classify(ip("17.1.2.3"), None), None);
    }

    #[test]
    fn test_from_cidrs_rejects_garbage() {
        let err = ProxyRanges::from_cidrs(&["not-a-range".to_string()], &[]).unwrap_err();
        assert_eq!(err, ProxyRangeError::InvalidCidr("not-a-range".to_string()));
    }

    #[test]
    fn test_proxy_kind_round_trip() {
        assert_eq!(ProxyKind::parse("apple"), Some(ProxyKind::Apple));
        assert_eq!(ProxyKind::parse("google"), Some(ProxyKind::Google));
        assert_eq!(ProxyKind::parse("yahoo"), None);
        assert_eq!(ProxyKind::Apple.to_string(), "apple");
    }
}
