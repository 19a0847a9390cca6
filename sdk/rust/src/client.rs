use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("reply is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Whatever the gateway answered, untouched.
#[derive(Debug, Clone)]
pub struct GatewayReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl GatewayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<serde_json::Value, SdkError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self::with_client(Client::new(), gateway_url)
    }

    pub fn with_client(client: Client, gateway_url: &str) -> Self {
        Self {
            client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<GatewayReply, SdkError> {
        let resp = self
            .client
            .get(format!("{}/health", self.gateway_url))
            .send()
            .await?;
        Self::collect(resp).await
    }

    /// Submit text for summarization as a JSON body.
    pub async fn summarize_text(&self, req: &SummarizeRequest) -> Result<GatewayReply, SdkError> {
        let resp = self
            .client
            .post(format!("{}/summarize", self.gateway_url))
            .json(req)
            .send()
            .await?;
        Self::collect(resp).await
    }

    /// Upload a file under the `file` form field.
    pub async fn summarize_file(&self, path: &Path) -> Result<GatewayReply, SdkError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| SdkError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        self.summarize_bytes(bytes, &file_name).await
    }

    pub async fn summarize_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<GatewayReply, SdkError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let resp = self
            .client
            .post(format!("{}/summarize", self.gateway_url))
            .multipart(form)
            .send()
            .await?;
        Self::collect(resp).await
    }

    async fn collect(resp: reqwest::Response) -> Result<GatewayReply, SdkError> {
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?.to_vec();

        Ok(GatewayReply {
            status,
            content_type,
            body,
        })
    }
}
