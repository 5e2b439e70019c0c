// Client identifier extraction.
//
// Behind a proxy the first X-Forwarded-For hop is the visitor, with
// X-Real-IP as the second choice. Served directly, the peer address from
// the connection is used. Only when none of those exist do requests share
// the "unknown" bucket.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn resolve(headers: &HeaderMap, peer: Option<IpAddr>) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        match forwarded.or_else(real_ip) {
            Some(id) => Self(id.to_string()),
            None => Self(
                peer.map(|ip| ip.to_string())
                    .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            ),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Present when served via into_make_service_with_connect_info
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(Self::resolve(&parts.headers, peer))
    }
}
