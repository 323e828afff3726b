//! Open recording service
//!
//! Classifies and stores pixel fetches. Every fetch for a known track is
//! stored; genuineness is computed downstream, never here.

use std::net::IpAddr;

use tracing::{debug, info, instrument};
use track_core::entities::{NewOpenEvent, OpenEvent};
use track_core::TrackingId;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Open recording service
pub struct OpenService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OpenService<'a> {
    /// Create a new OpenService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record one pixel fetch for a track
    ///
    /// Proxy attribution and the GeoIP lookup happen here, at insert time;
    /// the stored row never changes afterwards. Unknown tracks error out so
    /// the pixel handler can swallow the failure without inserting.
    #[instrument(skip_all, fields(track_id = %id))]
    pub async fn record_open(
        &self,
        id: TrackingId,
        ip: Option<IpAddr>,
        user_agent: Option<String>,
        referer: Option<String>,
    ) -> ServiceResult<OpenEvent> {
        if self.ctx.track_repo().find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Track", id.to_string()));
        }

        let proxy = self
            .ctx
            .tracking()
            .proxy_ranges
            .classify(ip, user_agent.as_deref());

        let location = ip
            .map(|addr| self.ctx.geo().lookup(addr))
            .unwrap_or_default();

        debug!(ip = ?ip, user_agent = ?user_agent, referer = ?referer, "Pixel fetch context");

        let event = NewOpenEvent {
            tracked_message_id: id,
            ip_address: ip.map(|addr| addr.to_string()),
            user_agent,
            referer,
            country: location.country,
            city: location.city,
            proxy,
        };

        let stored = self.ctx.open_repo().record(&event).await?;

        info!(open_id = stored.id, proxy = ?stored.proxy, "Open recorded");

        Ok(stored)
    }
}
