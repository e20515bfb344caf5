//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and proxies produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms)
//!     → http::request (x-request-id on every request span)
//!
//! Consumers:
//!     → stderr (log aggregation)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
