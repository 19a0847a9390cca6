//! Route handlers.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;

use crate::gateway::{classify, decode_json, extract_file, GatewayError, PayloadKind};
use crate::http::request::request_id;
use crate::http::response::relay;
use crate::http::server::AppState;

/// Liveness check. Never touches the downstream service.
pub async fn health() -> &'static str {
    "ok"
}

/// Forward a summarize request downstream and relay the answer.
pub async fn summarize(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, GatewayError> {
    let request_id = request_id(request.headers()).to_string();
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let kind = classify(&content_type);

    tracing::debug!(request_id = %request_id, kind = ?kind, "Summarize request received");

    let upstream = match kind {
        PayloadKind::Multipart => {
            let multipart = Multipart::from_request(request, &state)
                .await
                .map_err(|e| GatewayError::InvalidMultipart(e.body_text()))?;
            let file = extract_file(multipart).await?;
            state.gateway.forward_file(file).await?
        }
        PayloadKind::Json => {
            let body = Bytes::from_request(request, &state)
                .await
                .map_err(|_| GatewayError::InvalidBody)?;
            let payload = decode_json(&body)?;
            state.gateway.forward_json(&payload).await?
        }
    };

    tracing::debug!(
        request_id = %request_id,
        status = %upstream.status(),
        "Relaying downstream response"
    );

    Ok(relay(upstream))
}
