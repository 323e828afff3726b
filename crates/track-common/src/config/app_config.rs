//! Application configuration structs
//!
//! Loads configuration from environment variables. A `.env` file is honored
//! when present; required variables fail startup with the variable named.

use std::env;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use track_core::value_objects::{
    ProxyRanges, TrackingId, DEFAULT_APPLE_RANGES, DEFAULT_GOOGLE_RANGES,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub tracking: TrackingConfig,
    pub geoip: GeoIpConfig,
    pub cors: CorsConfig,
    /// None disables the notification subsystem entirely
    pub smtp: Option<SmtpConfig>,
    pub notify: NotifyConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// API authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Static key expected in the X-Api-Key header on /api routes
    pub api_key: String,
}

/// Pixel and classification configuration
#[derive(Debug, Clone)]
pub struct TrackingConfig {
    /// Public origin the pixel URLs are built from, no trailing slash
    pub base_url: String,
    /// Opens this close to registration count as the sender's own client
    pub suppression_window_secs: u64,
    pub proxy_ranges: ProxyRanges,
}

impl TrackingConfig {
    #[must_use]
    pub fn suppression_window(&self) -> Duration {
        Duration::seconds(self.suppression_window_secs as i64)
    }

    /// Absolute pixel URL for a track
    #[must_use]
    pub fn pixel_url(&self, id: TrackingId) -> String {
        format!("{}/p/{}.gif", self.base_url, id)
    }

    /// Ready-to-paste HTML snippet embedding the pixel
    #[must_use]
    pub fn html_snippet(&self, id: TrackingId) -> String {
        format!(
            r#"<img src="{}" width="1" height="1" style="display:none" alt="" />"#,
            self.pixel_url(id)
        )
    }
}

/// GeoIP database configuration
#[derive(Debug, Clone)]
pub struct GeoIpConfig {
    /// Path to a GeoLite2-City .mmdb file; None disables lookups
    pub db_path: Option<String>,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// SMTP relay configuration for notifications
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Operator address the notifications go to
    pub notify_to: String,
}

/// Notification worker configuration
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub follow_up_after_days: i64,
    pub scan_interval_secs: u64,
}

impl NotifyConfig {
    #[must_use]
    pub fn follow_up_after(&self) -> Duration {
        Duration::days(self.follow_up_after_days)
    }

    #[must_use]
    pub fn scan_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.scan_interval_secs)
    }
}

// Default value functions
fn default_app_name() -> String {
    "mailtrack".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8088
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_suppression_window_secs() -> u64 {
    5
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_follow_up_after_days() -> i64 {
    3
}

fn default_scan_interval_secs() -> u64 {
    900 // 15 minutes
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// present with unparsable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let smtp = match (
            optional("SMTP_USERNAME"),
            optional("SMTP_PASSWORD"),
            optional("NOTIFY_EMAIL"),
        ) {
            (Some(username), Some(password), Some(notify_to)) => Some(SmtpConfig {
                host: optional("SMTP_HOST").unwrap_or_else(default_smtp_host),
                port: parsed_or("SMTP_PORT", default_smtp_port())?,
                username,
                password,
                notify_to,
            }),
            _ => None,
        };

        Ok(Self {
            app: AppSettings {
                name: optional("APP_NAME").unwrap_or_else(default_app_name),
                env: optional("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: optional("SERVER_HOST").unwrap_or_else(default_host),
                port: parsed_or("SERVER_PORT", default_port())?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections())?,
                min_connections: parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections())?,
            },
            auth: AuthConfig {
                api_key: required("API_KEY")?,
            },
            tracking: TrackingConfig {
                base_url: required("BASE_URL")?.trim_end_matches('/').to_string(),
                suppression_window_secs: parsed_or(
                    "SUPPRESSION_WINDOW_SECS",
                    default_suppression_window_secs(),
                )?,
                proxy_ranges: load_proxy_ranges()?,
            },
            geoip: GeoIpConfig {
                db_path: optional("GEOIP_DB_PATH"),
            },
            cors: CorsConfig {
                allowed_origins: list("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            },
            smtp,
            notify: NotifyConfig {
                follow_up_after_days: parsed_or(
                    "NOTIFY_FOLLOW_UP_AFTER_DAYS",
                    default_follow_up_after_days(),
                )?,
                scan_interval_secs: parsed_or(
                    "NOTIFY_SCAN_INTERVAL_SECS",
                    default_scan_interval_secs(),
                )?,
            },
        })
    }

    /// Check whether the notification subsystem is configured
    #[must_use]
    pub fn notifications_enabled(&self) -> bool {
        self.smtp.is_some()
    }
}

/// Non-empty environment variable, trimmed
fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::MissingVar(key))
}

fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

/// Comma-separated list variable
fn list(key: &str) -> Option<Vec<String>> {
    optional(key).map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
}

fn load_proxy_ranges() -> Result<ProxyRanges, ConfigError> {
    let apple = list("PROXY_RANGES_APPLE")
        .unwrap_or_else(|| DEFAULT_APPLE_RANGES.iter().map(|s| (*s).to_string()).collect());
    let google = list("PROXY_RANGES_GOOGLE")
        .unwrap_or_else(|| DEFAULT_GOOGLE_RANGES.iter().map(|s| (*s).to_string()).collect());

    ProxyRanges::from_cidrs(&apple, &google)
        .map_err(|e| ConfigError::InvalidValue("PROXY_RANGES", e.to_string()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking() -> TrackingConfig {
        TrackingConfig {
            base_url: "https://track.example.com".to_string(),
            suppression_window_secs: 5,
            proxy_ranges: ProxyRanges::default(),
        }
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8088,
        };
        assert_eq!(config.address(), "0.0.0.0:8088");
    }

    #[test]
    fn test_pixel_url_and_snippet() {
        let config = tracking();
        let id = TrackingId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();

        assert_eq!(
            config.pixel_url(id),
            "https://track.example.com/p/550e8400-e29b-41d4-a716-446655440000.gif"
        );

        let snippet = config.html_snippet(id);
        assert!(snippet.starts_with("<img src=\"https://track.example.com/p/"));
        assert!(snippet.contains("width=\"1\""));
        assert!(snippet.contains("style=\"display:none\""));
    }

    #[test]
    fn test_suppression_window() {
        assert_eq!(tracking().suppression_window(), Duration::seconds(5));
    }

    #[test]
    fn test_notify_durations() {
        let config = NotifyConfig {
            follow_up_after_days: 3,
            scan_interval_secs: 900,
        };
        assert_eq!(config.follow_up_after(), Duration::days(3));
        assert_eq!(config.scan_interval(), StdDuration::from_secs(900));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "mailtrack");
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8088);
        assert_eq!(default_suppression_window_secs(), 5);
        assert_eq!(default_smtp_port(), 587);
        assert_eq!(default_follow_up_after_days(), 3);
        assert_eq!(default_scan_interval_secs(), 900);
    }
}
