//! Subscription proxy: forwards captured emails to a spreadsheet webhook.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SubscriptionConfig;
use crate::observability::metrics;
use crate::proxy::error::{ProxyError, UpstreamError};
use crate::proxy::forward;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const MISSING_SHEET_URL: &str = "Missing Sheet URL";
pub const SUBSCRIBED: &str = "Subscribed successfully";

/// Body accepted by `POST /api/subscribe`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Row appended by the webhook.
#[derive(Debug, Serialize)]
pub struct SubscriptionPayload<'a> {
    pub email: &'a str,
    pub timestamp: String,
}

impl<'a> SubscriptionPayload<'a> {
    pub fn new(email: &'a str, captured_at: DateTime<Utc>) -> Self {
        Self {
            email,
            // 2025-01-01T12:00:00.000Z
            timestamp: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Fixed envelope returned on success. The webhook's own body is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub success: bool,
    pub message: String,
}

impl SubscriptionResponse {
    pub fn subscribed() -> Self {
        Self {
            success: true,
            message: SUBSCRIBED.to_string(),
        }
    }
}

impl IntoResponse for SubscriptionResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Stateless proxy to the subscription webhook.
#[derive(Debug, Clone)]
pub struct SubscriptionProxy {
    client: reqwest::Client,
    config: SubscriptionConfig,
}

impl SubscriptionProxy {
    pub fn new(client: reqwest::Client, config: SubscriptionConfig) -> Self {
        Self { client, config }
    }

    /// Validate `email`, stamp it, and forward it once.
    pub async fn subscribe(&self, email: Option<&str>) -> Result<SubscriptionResponse, ProxyError> {
        let email = forward::require_field(email, EMAIL_REQUIRED)?;
        let sheet_url =
            forward::require_setting(self.config.sheet_url.as_deref(), MISSING_SHEET_URL)?;

        let payload = SubscriptionPayload::new(email, Utc::now());
        tracing::debug!(timestamp = %payload.timestamp, "Forwarding subscription");

        forward::post_json(self.client.post(sheet_url), &payload)
            .await
            .map_err(|e| self.upstream_failed(e))?;

        Ok(SubscriptionResponse::subscribed())
    }

    fn upstream_failed(&self, error: UpstreamError) -> ProxyError {
        tracing::error!(upstream = "subscription-webhook", error = %error, "Subscription upstream failed");
        metrics::record_upstream_failure("subscription-webhook");
        ProxyError::Upstream(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_payload_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let payload = SubscriptionPayload::new("trader@example.com", at);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "email": "trader@example.com", "timestamp": "2025-03-14T09:26:53.000Z" })
        );
    }

    #[test]
    fn test_success_envelope() {
        assert_eq!(
            serde_json::to_value(SubscriptionResponse::subscribed()).unwrap(),
            json!({ "success": true, "message": "Subscribed successfully" })
        );
    }

    #[tokio::test]
    async fn test_validation_order() {
        let proxy = SubscriptionProxy::new(reqwest::Client::new(), SubscriptionConfig::default());

        let err = proxy.subscribe(None).await.unwrap_err();
        assert!(matches!(err, ProxyError::BadRequest(EMAIL_REQUIRED)));

        let err = proxy.subscribe(Some("not-validated")).await.unwrap_err();
        assert!(matches!(err, ProxyError::Configuration(MISSING_SHEET_URL)));
    }
}
