//! Request identification.
//!
//! Every inbound request carries an `x-request-id`: a caller-supplied one
//! is kept, otherwise `tower_http`'s `MakeRequestUuid` generates a UUID v4.
//! The same id is echoed on the response.

use axum::http::{HeaderMap, HeaderName};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Read the request id from headers, `"unknown"` when absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
