//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (GEMINI_API_KEY, GOOGLE_SHEET_URL, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to each proxy at construction
//! ```
//!
//! # Design Decisions
//! - Config is resolved once per process; handlers never read the environment
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::{
    AnalysisConfig, ListenerConfig, MarketConfig, McpConfig, ObservabilityConfig, SecurityConfig,
    SubscriptionConfig, TimeoutConfig,
};
