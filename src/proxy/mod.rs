//! Request proxies.
//!
//! # Data Flow
//! ```text
//! handler (method already checked by the router)
//!     → forward::require_field     (400 if the caller's field is blank)
//!     → forward::require_setting   (500 if the secret/URL is not configured)
//!     → forward::post_json         (one outbound POST, no retry)
//!     → relay success, or log and translate to a generic 500
//! ```
//!
//! # Design Decisions
//! - Proxies hold their config and a shared `reqwest::Client`; nothing else
//! - Upstream failure detail is logged, never returned
//! - The two proxies do not know about each other

pub mod analysis;
pub mod error;
pub mod forward;
pub mod subscription;

pub use analysis::{AnalysisProxy, AnalysisRequest, AnalysisResponse};
pub use error::{ProxyError, UpstreamError};
pub use forward::UpstreamReply;
pub use subscription::{SubscriptionProxy, SubscriptionRequest, SubscriptionResponse};
