//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that would otherwise
//! only fail on the first request. Every problem is reported, not just the
//! first one.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a valid http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "analysis.endpoint", &config.analysis.endpoint);
    check_url(&mut errors, "market.crypto_api_url", &config.market.crypto_api_url);
    check_url(&mut errors, "market.forex_api_url", &config.market.forex_api_url);
    // A missing sheet URL is a runtime 500, not a startup failure.
    if let Some(sheet_url) = &config.subscription.sheet_url {
        check_url(&mut errors, "subscription.sheet_url", sheet_url);
    }

    if config.analysis.model.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "analysis.model" });
    }
    if config.analysis.system_instruction.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "analysis.system_instruction",
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero {
            field: "security.max_body_size",
        });
    }
    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }
    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::Zero {
            field: "timeouts.upstream_secs",
        });
    }
    if config.market.timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "market.timeout_secs",
        });
    }
    if config.mcp.tool_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "mcp.tool_timeout_secs",
        });
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.subscription.sheet_url = Some("ftp://sheets.example.com".into());
        config.security.max_body_size = 0;
        config.timeouts.upstream_secs = Some(0);
        config.observability.log_level = "loud".into();
        config.mcp.tool_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::Zero {
            field: "security.max_body_size"
        }));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
        assert!(errors.contains(&ValidationError::Zero {
            field: "mcp.tool_timeout_secs"
        }));
    }

    #[test]
    fn test_missing_sheet_url_is_allowed() {
        let mut config = GatewayConfig::default();
        config.subscription.sheet_url = None;
        config.analysis.api_key = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_blank_system_instruction_rejected() {
        let mut config = GatewayConfig::default();
        config.analysis.system_instruction = "   ".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Empty {
                field: "analysis.system_instruction"
            }]
        );
    }
}
