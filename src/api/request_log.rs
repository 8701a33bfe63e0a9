use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;

/// Logs every request on entry and again with its status and latency.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(request.headers(), peer);

    log::info!("Request... {} {} from {}", method, uri, ip);
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "Response... {} {} {} from {} - {}ms",
        method,
        uri,
        response.status().as_u16(),
        ip,
        started.elapsed().as_millis()
    );
    response
}

/// `x-forwarded-for` when a proxy set it, otherwise the socket peer.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let raw = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_default();
    raw.replace("::1", "127.0.0.1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));
        let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn test_loopback_v6_is_rewritten() {
        let peer: SocketAddr = "[::1]:5000".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "127.0.0.1");
        assert_eq!(client_ip(&HeaderMap::new(), None), "");
    }
}
