//! Request inspection helpers used for request logging.

use actix_web::{HttpRequest, http::header};

/// Proxy headers consulted for the originating client address, in order.
const CLIENT_IP_HEADERS: [&str; 3] = ["X-Forwarded-For", "X-Real-IP", "CF-Connecting-IP"];

/// Extract the client IP address, preferring proxy headers over the peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    CLIENT_IP_HEADERS
        .iter()
        .filter_map(|name| req.headers().get(*name))
        .filter_map(|value| value.to_str().ok())
        // X-Forwarded-For carries a chain; the first hop is the client
        .filter_map(|value| value.split(',').next().map(str::trim))
        .find(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| req.connection_info().peer_addr().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Extract the user agent header, if present and valid.
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}
