use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Bucket shared by every request whose origin cannot be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate-limit key for a request
///
/// Priority:
/// 1. First entry of X-Forwarded-For (requests through proxies)
/// 2. Peer socket address (direct connection)
/// 3. The shared "unknown" bucket
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
