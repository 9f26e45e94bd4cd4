use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

use super::identity::user_id_from_headers;

/// Logs one `REQ` line per request: remote address, method, URI and the
/// identity header as received.
pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let user = user_id_from_headers(request.headers());
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(
        remote = %remote,
        method = %method,
        uri = %uri,
        user = %user,
        status = response.status().as_u16(),
        "REQ"
    );
    response
}
