//! Client IP extraction.
//!
//! Resolution order: the first syntactically valid entry of
//! `X-Forwarded-For`, then the peer socket address. The header is
//! client-controlled unless a trusted proxy sits in front, so treat the
//! result as informational (logging, analytics), not as an auth input.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

/// Resolve the client IP from request headers, falling back to the socket
/// address, or `"unknown"` when neither yields a valid IP.
pub fn client_ip(headers: &HeaderMap, socket_addr: Option<&SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded
            .split(',')
            .map(str::trim)
            .find(|entry| !entry.is_empty())
        {
            if first.parse::<IpAddr>().is_ok() {
                return first.to_string();
            }
        }
    }

    match socket_addr {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Extractor form of [`client_ip`] for handlers. Uses `ConnectInfo` for the
/// socket fallback when the router was built with
/// `into_make_service_with_connect_info`.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let socket_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);
        Ok(ClientIp(client_ip(&parts.headers, socket_addr.as_ref())))
    }
}
