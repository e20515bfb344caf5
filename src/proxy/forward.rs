//! The validate → inject → forward → relay shape shared by both proxies.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde::Serialize;

use crate::proxy::error::{ProxyError, UpstreamError};

/// A successful upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Require a caller-supplied field that is non-empty after trimming.
///
/// Returns the value untrimmed; it is forwarded as sent.
pub fn require_field<'a>(
    value: Option<&'a str>,
    missing: &'static str,
) -> Result<&'a str, ProxyError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProxyError::BadRequest(missing)),
    }
}

/// Require a server-side setting (secret or URL).
pub fn require_setting<'a>(
    value: Option<&'a str>,
    missing: &'static str,
) -> Result<&'a str, ProxyError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProxyError::Configuration(missing)),
    }
}

/// Send `payload` as JSON and collect the response.
///
/// Exactly one attempt. A non-success status is turned into
/// [`UpstreamError::Status`] carrying the upstream body.
pub async fn post_json<T>(
    request: reqwest::RequestBuilder,
    payload: &T,
) -> Result<UpstreamReply, UpstreamError>
where
    T: Serialize + ?Sized,
{
    let response = request.json(payload).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Status { status, body });
    }

    let body = response.bytes().await?;
    Ok(UpstreamReply { status, body })
}
