//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuthConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    GeoIpConfig, NotifyConfig, ServerConfig, SmtpConfig, TrackingConfig,
};
