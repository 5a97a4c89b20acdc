//! HTTP server with graceful shutdown

use axum::{middleware, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::Result,
    middleware::{
        normalize_errors, request_id_layer, request_id_propagation_layer,
        sensitive_headers_layer, ErrorNormalizer,
    },
};

/// HTTP server wrapping a router in the transport middleware stack
pub struct Server {
    config: Config,
    normalizer: ErrorNormalizer,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let normalizer = ErrorNormalizer::new(config.disclose_diagnostics());
        Self { config, normalizer }
    }

    /// Bind `0.0.0.0:<port>` and serve until SIGINT or SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        let app = self.layered(app);

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Apply the transport middleware stack
    ///
    /// Each layer wraps the ones before it. The error normalizer sits outside
    /// the timeout and body limit so their bare 408 and 413 rejections still
    /// get a normalized body.
    pub fn layered(&self, app: Router) -> Router {
        app.layer(self.build_cors_layer())
            .layer(CompressionLayer::new().gzip(self.config.middleware.compression))
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ))
            .layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes()))
            .layer(middleware::from_fn_with_state(
                self.normalizer,
                normalize_errors,
            ))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer())
    }

    fn log_middleware_config(&self) {
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Request ID tracking: enabled");
        tracing::info!("  - Sensitive header masking: enabled");
        tracing::info!(
            "  - Request body limit: {} MB",
            self.config.middleware.body_limit_mb
        );
        tracing::info!(
            "  - Compression: {}",
            if self.config.middleware.compression {
                "enabled"
            } else {
                "disabled"
            }
        );
        tracing::info!("  - CORS mode: {}", self.config.middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
        tracing::info!(
            "  - Error diagnostics: {}",
            if self.normalizer.discloses_diagnostics() {
                "disclosed"
            } else {
                "withheld"
            }
        );
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn build_cors_layer(&self) -> CorsLayer {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                CorsLayer::permissive()
            }
            "restrictive" | "disabled" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                CorsLayer::new()
            }
            _ => {
                tracing::warn!(
                    "Unknown CORS mode: {}, defaulting to permissive",
                    self.config.middleware.cors_mode
                );
                CorsLayer::permissive()
            }
        }
    }
}

/// Resolve on SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::NormalizedError;
    use axum::{
        body::{to_bytes, Body},
        routing::{get, post},
    };
    use http::{header, Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    fn disclosing_config() -> Config {
        let mut config = Config::default();
        config.errors.disclose_diagnostics = Some(true);
        config
    }

    async fn normalized_body(response: axum::response::Response) -> NormalizedError {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, config.service.port);
    }

    #[tokio::test]
    async fn test_layered_router_tags_requests() {
        let server = Server::new(Config::default());
        let app = server.layered(Router::new().route("/ping", get(|| async { "pong" })));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(header::ORIGIN, "https://shop.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers().get("x-request-id").unwrap();
        assert!(request_id.to_str().unwrap().starts_with("req_"));
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = disclosing_config();
        config.middleware.body_limit_mb = 1;
        let server = Server::new(config);
        let app = server.layered(
            Router::new().route("/echo", post(|body: String| async move { body })),
        );

        let oversized = "x".repeat(2 * 1024 * 1024);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header(header::CONTENT_LENGTH, oversized.len())
                    .body(Body::from(oversized))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = normalized_body(response).await;
        assert_eq!(body.message, "Request entity too large");
        assert!(body.stack.unwrap().contains("413 Payload Too Large"));
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_normalized_body() {
        let mut config = disclosing_config();
        config.service.timeout_secs = 1;
        let server = Server::new(config);
        let app = server.layered(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        ));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(response.headers().contains_key("x-request-id"));

        let body = normalized_body(response).await;
        assert_eq!(body.message, "Request timed out");
        assert!(body.stack.unwrap().contains("408 Request Timeout"));
    }

    #[tokio::test]
    async fn test_withheld_diagnostics_on_transport_rejection() {
        let mut config = Config::default();
        config.errors.disclose_diagnostics = Some(false);
        config.service.timeout_secs = 1;
        let app = Server::new(config).layered(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        ));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(normalized_body(response).await.stack.is_none());
    }
}
