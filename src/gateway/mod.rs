//! Request-forwarding core.
//!
//! # Data Flow
//! ```text
//! inbound body
//!     → classify (Content-Type)
//!     → multipart: extract_file → forward_file → POST <base><file_path>
//!     → otherwise: decode_json → forward_json → POST <base><text_path>
//!     → reqwest::Response, handed back for relay
//! ```
//!
//! One inbound request produces at most one outbound request. Nothing is
//! retried or cached.

pub mod error;

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::Multipart;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{Map, Value};

use crate::config::DownstreamConfig;

pub use error::{GatewayError, GatewayResult};

/// Form field carrying the uploaded document, inbound and outbound.
pub const FILE_FIELD: &str = "file";

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// How an inbound body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    Multipart,
}

/// Classify by `Content-Type`. Anything that is not multipart form data,
/// including a missing header, goes down the JSON path.
pub fn classify(content_type: &str) -> PayloadKind {
    if content_type.starts_with(MULTIPART_FORM_DATA) {
        PayloadKind::Multipart
    } else {
        PayloadKind::Json
    }
}

/// The `file` part lifted out of an inbound form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Decode a body as a JSON object. No schema is enforced on its fields.
pub fn decode_json(body: &[u8]) -> GatewayResult<Map<String, Value>> {
    serde_json::from_slice(body).map_err(|e| GatewayError::InvalidJson(e.to_string()))
}

/// Find the first part named `file` that carries a filename. Other parts
/// are skipped.
pub async fn extract_file(mut multipart: Multipart) -> GatewayResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::InvalidMultipart(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| GatewayError::InvalidMultipart(e.body_text()))?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(GatewayError::MissingFile("no such file".to_string()))
}

/// Client for the downstream summarization service.
///
/// Built once from an explicit [`DownstreamConfig`] and shared by all
/// handlers; it holds no per-request state.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    downstream: DownstreamConfig,
}

impl Gateway {
    pub fn new(downstream: DownstreamConfig) -> GatewayResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = downstream.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if !downstream.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            downstream,
        })
    }

    pub fn downstream(&self) -> &DownstreamConfig {
        &self.downstream
    }

    /// Join the base URL with a downstream path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.downstream.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON object, re-encoded as-is, to the text endpoint.
    pub async fn forward_json(
        &self,
        payload: &Map<String, Value>,
    ) -> GatewayResult<reqwest::Response> {
        let url = self.endpoint(&self.downstream.text_path);
        tracing::debug!(
            target_url = %url,
            fields = payload.len(),
            "Forwarding JSON summarize request"
        );

        let request = self.client.post(&url).json(payload);
        self.send(&url, request).await
    }

    /// POST a freshly encoded multipart body with a single `file` part to
    /// the file endpoint. The original filename is preserved.
    pub async fn forward_file(&self, file: UploadedFile) -> GatewayResult<reqwest::Response> {
        let url = self.endpoint(&self.downstream.file_path);
        tracing::debug!(
            target_url = %url,
            file_name = %file.file_name,
            inbound_content_type = ?file.content_type,
            size = file.bytes.len(),
            "Forwarding file summarize request"
        );

        let length = file.bytes.len() as u64;
        let part = Part::stream_with_length(reqwest::Body::from(file.bytes), length)
            .file_name(file.file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| GatewayError::Encode(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        let request = self.client.post(&url).multipart(form);
        self.send(&url, request).await
    }

    async fn send(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> GatewayResult<reqwest::Response> {
        request.send().await.map_err(|e| {
            tracing::error!(target_url = %url, error = %e, "Downstream request failed");
            GatewayError::Downstream(e.to_string())
        })
    }
}
