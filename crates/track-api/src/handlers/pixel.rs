//! Tracking pixel handler
//!
//! The one endpoint mail clients talk to. Whatever happens inside, the
//! response is the same 200 with the GIF: the endpoint must not reveal
//! whether an id exists and must never break email rendering.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use track_core::TrackingId;
use track_service::OpenService;

use crate::extractors::ClientIp;
use crate::state::AppState;

/// 1x1 transparent GIF, 42 bytes
pub const TRACKING_PIXEL: [u8; 42] = [
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, // GIF89a
    0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, // 1x1, global palette
    0x00, 0x00, 0x00, 0xff, 0xff, 0xff, // black, white
    0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, // transparency extension
    0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, // image descriptor
    0x02, 0x01, 0x44, 0x00, // pixel data
    0x3b, // trailer
];

/// Serve the pixel and record the open
///
/// GET /p/{id}.gif
pub async fn serve_pixel(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
) -> Response {
    match strip_extension(&raw_id).parse::<TrackingId>() {
        Ok(id) => {
            let user_agent = header_string(&headers, header::USER_AGENT.as_str());
            let referer = header_string(&headers, header::REFERER.as_str());

            let service = OpenService::new(state.service_context());
            if let Err(e) = service.record_open(id, ip, user_agent, referer).await {
                if e.is_not_found() {
                    debug!(id = %raw_id, "Pixel fetch for unknown track");
                } else {
                    warn!(error = %e, id = %raw_id, "Failed to record open");
                }
            }
        }
        Err(_) => {
            debug!(id = %raw_id, "Pixel fetch with malformed id");
        }
    }

    pixel_response()
}

/// The identifier without its file extension
fn strip_extension(raw: &str) -> &str {
    match raw.split_once('.') {
        Some((stem, _)) => stem,
        None => raw,
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// 200 plus cache-defeating headers, unconditionally
fn pixel_response() -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        TRACKING_PIXEL.as_slice(),
    )
        .into_response()
}
