//! Analysis proxy: forwards trade rationales to the generative-text API.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::observability::metrics;
use crate::proxy::error::{ProxyError, UpstreamError};
use crate::proxy::forward::{self, UpstreamReply};

pub const INPUT_REQUIRED: &str = "Input is required";
pub const MISSING_API_KEY: &str = "Missing API Key";

/// Body accepted by `POST /api/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub input: Option<String>,
}

/// Upstream `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: [Content<'a>; 1],
    pub system_instruction: Content<'a>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn new(input: &'a str, system_instruction: &'a str) -> Self {
        Self {
            contents: [Content {
                parts: [Part { text: input }],
            }],
            system_instruction: Content {
                parts: [Part {
                    text: system_instruction,
                }],
            },
        }
    }
}

/// Upstream JSON relayed verbatim to the caller.
#[derive(Debug, Clone)]
pub struct AnalysisResponse(pub UpstreamReply);

impl AnalysisResponse {
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.0.body)
    }
}

impl IntoResponse for AnalysisResponse {
    fn into_response(self) -> Response {
        let UpstreamReply { status, body } = self.0;
        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}

/// Stateless proxy to the generative-language API.
#[derive(Debug, Clone)]
pub struct AnalysisProxy {
    client: reqwest::Client,
    config: AnalysisConfig,
}

impl AnalysisProxy {
    pub fn new(client: reqwest::Client, config: AnalysisConfig) -> Self {
        Self { client, config }
    }

    /// Validate `input`, forward it once, and return the upstream body.
    pub async fn analyze(&self, input: Option<&str>) -> Result<AnalysisResponse, ProxyError> {
        let input = forward::require_field(input, INPUT_REQUIRED)?;
        let api_key = forward::require_setting(self.config.api_key.as_deref(), MISSING_API_KEY)?;

        let payload = GenerateContentRequest::new(input, &self.config.system_instruction);
        let request = self
            .client
            .post(self.config.generate_url())
            .query(&[("key", api_key)]);

        tracing::debug!(model = %self.config.model, input_len = input.len(), "Forwarding analysis request");

        let reply = forward::post_json(request, &payload)
            .await
            .and_then(|reply| {
                // Success bodies must be JSON; the caller expects to parse them.
                serde_json::from_slice::<serde::de::IgnoredAny>(&reply.body)?;
                Ok(reply)
            })
            .map_err(|e| self.upstream_failed(e))?;

        Ok(AnalysisResponse(reply))
    }

    fn upstream_failed(&self, error: UpstreamError) -> ProxyError {
        tracing::error!(upstream = "generative-language", model = %self.config.model, error = %error, "Analysis upstream failed");
        metrics::record_upstream_failure("generative-language");
        ProxyError::Upstream(error)
    }
}
