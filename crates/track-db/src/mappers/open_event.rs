//! Open event entity <-> model mapper

use track_core::entities::OpenEvent;
use track_core::value_objects::{ProxyKind, TrackingId};

use crate::models::OpenEventModel;

/// Convert OpenEventModel to OpenEvent entity
impl From<OpenEventModel> for OpenEvent {
    fn from(model: OpenEventModel) -> Self {
        OpenEvent {
            id: model.id,
            tracked_message_id: TrackingId::new(model.tracked_message_id),
            opened_at: model.opened_at,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            referer: model.referer,
            country: model.country,
            city: model.city,
            // Unknown stored values map to None rather than failing the read
            proxy: model.proxy.as_deref().and_then(ProxyKind::parse),
        }
    }
}

/// Convert NewOpenEvent reference to values for database insertion
pub struct OpenEventInsert<'a> {
    pub tracked_message_id: uuid::Uuid,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub referer: Option<&'a str>,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
    pub proxy: Option<&'static str>,
}

impl<'a> OpenEventInsert<'a> {
    pub fn new(event: &'a track_core::entities::NewOpenEvent) -> Self {
        Self {
            tracked_message_id: event.tracked_message_id.into_inner(),
            ip_address: event.ip_address.as_deref(),
            user_agent: event.user_agent.as_deref(),
            referer: event.referer.as_deref(),
            country: event.country.as_deref(),
            city: event.city.as_deref(),
            proxy: event.proxy.map(ProxyKind::as_str),
        }
    }
}
