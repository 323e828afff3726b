//! Client IP extractor
//!
//! Resolves the originating address behind a reverse proxy: `X-Real-IP`
//! first, then the first entry of `X-Forwarded-For`, then the socket peer.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

/// Best-effort client address; None when nothing resolvable was sent
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = ip_from_headers(&parts.headers).or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        });

        Ok(ClientIp(ip))
    }
}

/// Proxy-supplied address, when present and parsable
fn ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        if let Ok(ip) = real_ip.trim().parse() {
            return Some(ip);
        }
    }

    let forwarded = header_str(headers, "x-forwarded-for")?;
    forwarded.split(',').next()?.trim().parse().ok()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
