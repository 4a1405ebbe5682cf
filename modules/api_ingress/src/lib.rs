//! HTTP entry stack: mounts the API router under its prefix, adds `/health`,
//! serves static files for everything else and wraps it all in the shared
//! middleware (request id, tracing, CORS, timeout, body limit).

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use axum::http::Method;
use axum::{middleware::from_fn, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::{
    ApiIngressConfig, DEFAULT_API_PREFIX, DEFAULT_BODY_LIMIT_BYTES, DEFAULT_REQUEST_TIMEOUT_SEC,
    DEFAULT_STATIC_DIR,
};

/// Name of the section under `modules` this crate reads its config from.
pub const MODULE_NAME: &str = "api_ingress";

/// Owns the ingress configuration and turns an API router into the router
/// the server listens with.
#[derive(Debug, Clone, Default)]
pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Any origin; the methods the users API exposes.
    fn cors_layer() -> CorsLayer {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    }

    /// Build the HTTP router around `api`.
    pub fn build_router(&self, api: Router) -> Router {
        let config = &self.config;

        let mut router = Router::new().route("/health", get(web::health_check));
        router = match config.normalized_prefix() {
            Some(prefix) => {
                tracing::debug!(prefix = %prefix, "Mounting API router");
                router.nest(&prefix, api)
            }
            None => router.merge(api),
        };

        tracing::debug!(dir = %config.static_dir, "Serving static files as fallback");
        router = router.fallback_service(ServeDir::new(&config.static_dir));

        // Layers are added innermost first; the request id layers end up outermost
        // so the trace span and the handlers already see the id.

        // 1. Body limit
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

        // 2. Timeout (0 disables it)
        if config.request_timeout_sec > 0 {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_sec,
            )));
        }

        // 3. CORS (if enabled)
        if config.cors_enabled {
            router = router.layer(Self::cors_layer());
        }

        // 4. Put request_id into extensions and span
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));

        // 5. Trace with request_id/status/latency
        router = router.layer(request_id::create_trace_layer());

        // 6. Echo x-request-id back on the response
        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

        // 7. Generate x-request-id when missing
        router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Serve `router` on `listener` until `shutdown` resolves, then drain
    /// in-flight requests.
    pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("HTTP server bound on {}", addr);
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
