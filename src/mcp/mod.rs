//! Model Context Protocol server.
//!
//! Exposes the trading tools to AI assistants over stdio:
//! `analyze_trade`, `calculate_risk`, `subscribe_email`, `fetch_market_data`.
//! Analysis and subscription reuse the HTTP proxies, so the prompt and the
//! upstream contract stay in one place.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
