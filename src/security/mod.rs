//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (reject oversized bodies)
//!     → handler
//! Outgoing response:
//!     → headers.rs (security headers)
//! ```

pub mod headers;
pub mod limits;
