//! Request logging middleware.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

use super::client_ip::client_ip;

/// Log one line per handled request: method, URI, client IP, response
/// status, and elapsed time. Attach with `axum::middleware::from_fn`.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let socket_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let ip = client_ip(request.headers(), socket_addr.as_ref());

    let started = Instant::now();
    let response = next.run(request).await;

    tracing::info!(
        %method,
        %uri,
        client_ip = %ip,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "handled request"
    );

    response
}
