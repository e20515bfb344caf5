//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy and health routes
//! - Wire up middleware (request ID, tracing, limits, security headers)
//! - Bind server to listener
//! - Stop accepting and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    handler::Handler,
    http::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::lifecycle::startup::{self, StartupError};
use crate::proxy::{AnalysisProxy, SubscriptionProxy};
use crate::security;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisProxy>,
    pub subscription: Arc<SubscriptionProxy>,
}

impl AppState {
    pub fn new(config: &GatewayConfig, client: reqwest::Client) -> Self {
        Self {
            analysis: Arc::new(AnalysisProxy::new(client.clone(), config.analysis.clone())),
            subscription: Arc::new(SubscriptionProxy::new(
                client,
                config.subscription.clone(),
            )),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let client = startup::http_client(&config.timeouts)?;
        let state = AppState::new(&config, client);
        let router = Self::build_router(&config, state);

        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        // The body limit wraps only the POST handlers so the method check runs first.
        let limit = security::limits::body_limit(&config.security);

        let mut router = Router::new()
            .route(
                "/api/analyze",
                post(handlers::analyze.layer(limit.clone()))
                    .fallback(|| handlers::method_not_allowed("analyze")),
            )
            .route(
                "/api/subscribe",
                post(handlers::subscribe.layer(limit))
                    .fallback(|| handlers::method_not_allowed("subscribe")),
            )
            .route("/health", get(handlers::health))
            .with_state(state);

        if let Some(secs) = config.timeouts.request_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }
        if config.security.enable_headers {
            router = security::headers::apply(router);
        }

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request),
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            analysis_configured = self.config.analysis.api_key.is_some(),
            subscription_configured = self.config.subscription.sheet_url.is_some(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
