//! Downstream response relay.
//!
//! Status, headers and body are copied verbatim. Multi-valued headers
//! keep every value in order. The body is streamed, never buffered.

use axum::body::Body;
use axum::response::Response;
use futures_util::TryStreamExt;

/// Turn a downstream response into the inbound response, unchanged.
pub fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let headers = upstream.headers().clone();

    let stream = upstream.bytes_stream().inspect_err(|e| {
        tracing::warn!(error = %e, "Downstream body stream failed mid-relay");
    });

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = status;

    let out = response.headers_mut();
    for (name, value) in headers.iter() {
        out.append(name.clone(), value.clone());
    }

    response
}
