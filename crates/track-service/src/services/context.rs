//! Service context - dependency container for services
//!
//! Holds the repositories, the geo resolver, the optional mailer, and the
//! configuration slices the services read.

use std::sync::Arc;

use track_common::{NotifyConfig, TrackingConfig};
use track_core::traits::{OpenEventRepository, TrackRepository};
use track_db::PgPool;
use track_geo::{GeoResolver, SharedGeoResolver};
use track_notify::Mailer;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - The GeoIP resolver (possibly disabled)
/// - The SMTP mailer, when notifications are configured
/// - Tracking and notification configuration
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Repositories
    track_repo: Arc<dyn TrackRepository>,
    open_repo: Arc<dyn OpenEventRepository>,

    // External lookups
    geo: SharedGeoResolver,

    // None disables the notification subsystem
    mailer: Option<Arc<Mailer>>,

    // Configuration
    tracking: TrackingConfig,
    notify: NotifyConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: PgPool,
        track_repo: Arc<dyn TrackRepository>,
        open_repo: Arc<dyn OpenEventRepository>,
        geo: SharedGeoResolver,
        mailer: Option<Arc<Mailer>>,
        tracking: TrackingConfig,
        notify: NotifyConfig,
    ) -> Self {
        Self {
            pool,
            track_repo,
            open_repo,
            geo,
            mailer,
            tracking,
            notify,
        }
    }

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the track repository
    pub fn track_repo(&self) -> &dyn TrackRepository {
        self.track_repo.as_ref()
    }

    /// Get the open event repository
    pub fn open_repo(&self) -> &dyn OpenEventRepository {
        self.open_repo.as_ref()
    }

    /// Get the GeoIP resolver
    pub fn geo(&self) -> &GeoResolver {
        self.geo.as_ref()
    }

    /// Get the mailer, when notifications are configured
    pub fn mailer(&self) -> Option<&Mailer> {
        self.mailer.as_deref()
    }

    /// Get the tracking configuration
    pub fn tracking(&self) -> &TrackingConfig {
        &self.tracking
    }

    /// Get the notification worker configuration
    pub fn notify_config(&self) -> &NotifyConfig {
        &self.notify
    }

    /// The configured suppression window
    pub fn suppression_window(&self) -> chrono::Duration {
        self.tracking.suppression_window()
    }

    /// Check whether the notification subsystem is configured
    pub fn notifications_enabled(&self) -> bool {
        self.mailer.is_some()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("geo_enabled", &self.geo.is_enabled())
            .field("notifications_enabled", &self.notifications_enabled())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    track_repo: Option<Arc<dyn TrackRepository>>,
    open_repo: Option<Arc<dyn OpenEventRepository>>,
    geo: Option<SharedGeoResolver>,
    mailer: Option<Arc<Mailer>>,
    tracking: Option<TrackingConfig>,
    notify: Option<NotifyConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            track_repo: None,
            open_repo: None,
            geo: None,
            mailer: None,
            tracking: None,
            notify: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn track_repo(mut self, repo: Arc<dyn TrackRepository>) -> Self {
        self.track_repo = Some(repo);
        self
    }

    pub fn open_repo(mut self, repo: Arc<dyn OpenEventRepository>) -> Self {
        self.open_repo = Some(repo);
        self
    }

    pub fn geo(mut self, geo: SharedGeoResolver) -> Self {
        self.geo = Some(geo);
        self
    }

    /// The mailer is optional; leaving it unset disables notifications
    pub fn mailer(mut self, mailer: Arc<Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn tracking(mut self, tracking: TrackingConfig) -> Self {
        self.tracking = Some(tracking);
        self
    }

    pub fn notify(mut self, notify: NotifyConfig) -> Self {
        self.notify = Some(notify);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;

        Ok(ServiceContext::new(
            self.pool
                .ok_or_else(|| ServiceError::validation("pool is required"))?,
            self.track_repo
                .ok_or_else(|| ServiceError::validation("track_repo is required"))?,
            self.open_repo
                .ok_or_else(|| ServiceError::validation("open_repo is required"))?,
            self.geo
                .ok_or_else(|| ServiceError::validation("geo is required"))?,
            self.mailer,
            self.tracking
                .ok_or_else(|| ServiceError::validation("tracking config is required"))?,
            self.notify
                .ok_or_else(|| ServiceError::validation("notify config is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
