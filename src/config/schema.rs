//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::verdict::DEFAULT_SYSTEM_INSTRUCTION;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Generative-text upstream used by the analysis proxy.
    pub analysis: AnalysisConfig,

    /// Webhook upstream used by the subscription proxy.
    pub subscription: SubscriptionConfig,

    /// Market data sources used by the MCP tools.
    pub market: MarketConfig,

    /// MCP tool server settings.
    pub mcp: McpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Security hardening settings.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
///
/// Both timeouts are unset by default: a proxied call blocks until the
/// upstream answers or the transport gives up.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout enforced by the HTTP server, in seconds.
    pub request_secs: Option<u64>,

    /// Timeout applied to each outbound upstream call, in seconds.
    pub upstream_secs: Option<u64>,
}

/// Generative-text upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// API key sent as the `key` query parameter. Usually injected through
    /// `GEMINI_API_KEY` rather than written to the config file.
    pub api_key: Option<String>,

    /// Base URL of the generative-language API.
    pub endpoint: String,

    /// Model identifier used for `:generateContent`.
    pub model: String,

    /// Instruction sent alongside every user input.
    pub system_instruction: String,
}

impl AnalysisConfig {
    /// Full URL of the `generateContent` call, without the key.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        }
    }
}

/// Subscription webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Spreadsheet webhook receiving `{ email, timestamp }`.
    pub sheet_url: Option<String>,
}

/// Market data configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketConfig {
    /// CoinGecko-compatible API base URL.
    pub crypto_api_url: String,

    /// ExchangeRate-API-compatible base URL (`/{base}` is appended).
    pub forex_api_url: String,

    /// Timeout for market data calls in seconds.
    pub timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            crypto_api_url: "https://api.coingecko.com/api/v3".to_string(),
            forex_api_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
            timeout_secs: 10,
        }
    }
}

/// MCP tool server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct McpConfig {
    /// Deadline for tools that call an upstream (analysis, subscription).
    pub tool_timeout_secs: u64,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            tool_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024, // 64KB
        }
    }
}
