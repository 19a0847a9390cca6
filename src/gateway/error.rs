//! Gateway error taxonomy and its HTTP mapping.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Every way a summarize request can fail.
///
/// Client input problems map to 400, transport failures towards the
/// downstream service to 502. Errors render as plain-text bodies.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid body")]
    InvalidBody,

    #[error("could not parse multipart: {0}")]
    InvalidMultipart(String),

    #[error("file is required in form field 'file': {0}")]
    MissingFile(String),

    #[error("invalid json body: {0}")]
    InvalidJson(String),

    #[error("error copying file: {0}")]
    Encode(String),

    #[error("error contacting llm service: {0}")]
    Downstream(String),

    #[error("could not build downstream client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidBody
            | GatewayError::InvalidMultipart(_)
            | GatewayError::MissingFile(_)
            | GatewayError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            GatewayError::Encode(_) | GatewayError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Downstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{}\n", self),
        )
            .into_response()
    }
}
