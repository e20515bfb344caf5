//! Request size limits.
//!
//! Applied to the POST handlers only. A `Content-Length` above
//! `security.max_body_size` is rejected with 413 Payload Too Large before the
//! handler runs. A body without one (chunked) is cut off while it is read,
//! which the handler sees as an unreadable body and answers with 400.

use tower_http::limit::RequestBodyLimitLayer;

use crate::config::SecurityConfig;

pub fn body_limit(config: &SecurityConfig) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(config.max_body_size)
}
