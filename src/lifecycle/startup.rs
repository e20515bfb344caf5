//! Startup orchestration.
//!
//! Builds the shared outbound client and binds the listener. Any failure
//! here is fatal.

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ListenerConfig, TimeoutConfig};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

/// Build the pooled client shared by every outbound call.
///
/// No timeout is set unless `timeouts.upstream_secs` is configured.
pub fn http_client(timeouts: &TimeoutConfig) -> Result<reqwest::Client, StartupError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("mbridge-gateway/", env!("CARGO_PKG_VERSION")));

    if let Some(secs) = timeouts.upstream_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}

/// Bind the configured listener address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Listening for connections");
    }
    Ok(listener)
}
