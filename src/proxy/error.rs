//! Error types shared by both proxies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Generic message returned for every upstream failure.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Failure talking to the forwarded-to service.
///
/// Carries full detail for server-side logs. None of it reaches the caller.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("upstream returned a non-JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Everything a proxy invocation can fail with.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Server configuration error: {0}")]
    Configuration(&'static str),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Configuration(_) | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::Upstream(_) => INTERNAL_SERVER_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.public_message(),
        }));

        (self.status(), body).into_response()
    }
}
