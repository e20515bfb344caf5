//! MBridge gateway library.
//!
//! A thin server-side proxy for the MBridge trading-coach front end: it
//! holds the secrets for the generative-language API and the subscriber
//! sheet, forwards validated requests, and never leaks upstream detail.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod market;
pub mod mcp;
pub mod observability;
pub mod proxy;
pub mod risk;
pub mod security;
pub mod verdict;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
