//! Uniform error responses
//!
//! [`ErrorNormalizer`] wraps the whole router. Any response that carries an
//! [`ApiError`] in its extensions is replaced by a body of the form
//!
//! ```json
//! { "message": "...", "stack": "..." }
//! ```
//!
//! where `stack` is the diagnostic trace when diagnostics are disclosed and
//! `null` otherwise.
//!
//! The same middleware also runs outside the transport layers, where it
//! rewrites bare 408 (timeout) and 413 (body limit) rejections that never
//! reached a handler. Responses it has already rewritten are marked and left
//! alone; every other response passes through untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{middleware, Router};
//! use catalog_service::middleware::{normalize_errors, ErrorNormalizer};
//!
//! let normalizer = ErrorNormalizer::new(config.disclose_diagnostics());
//! let app = Router::new()
//!     .route("/products", get(list_products))
//!     .layer(middleware::from_fn_with_state(normalizer, normalize_errors));
//! ```

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::handlers::ApiError;

/// Wire shape of every normalized failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub message: String,
    /// Always present; `null` when diagnostics are withheld
    pub stack: Option<String>,
}

/// Marks a response that has already been normalized
#[derive(Debug, Clone, Copy)]
struct Normalized;

/// Turns handler failures into [`NormalizedError`] responses
#[derive(Debug, Clone, Copy)]
pub struct ErrorNormalizer {
    disclose_diagnostics: bool,
}

impl ErrorNormalizer {
    pub fn new(disclose_diagnostics: bool) -> Self {
        Self {
            disclose_diagnostics,
        }
    }

    pub fn discloses_diagnostics(&self) -> bool {
        self.disclose_diagnostics
    }

    /// Build the response body for an error
    pub fn body(&self, error: &ApiError) -> NormalizedError {
        NormalizedError {
            message: error.message.clone(),
            stack: self
                .disclose_diagnostics
                .then(|| error.diagnostic_trace()),
        }
    }

    /// Log the error and render the final response
    pub fn normalize(&self, error: &ApiError) -> Response {
        let status = error.status_code();

        if status.is_server_error() {
            let cause = error
                .source
                .as_ref()
                .map(|source| format!("{:#}", source))
                .unwrap_or_default();
            tracing::error!(
                operation = %error.operation,
                status = status.as_u16(),
                cause = %cause,
                "Request failed: {}", error.message
            );
        } else {
            tracing::warn!(
                operation = %error.operation,
                status = status.as_u16(),
                "Request rejected: {}", error.message
            );
        }

        let mut response = (status, Json(self.body(error))).into_response();
        response.extensions_mut().insert(Normalized);
        response
    }
}

/// Bare rejection from a transport layer, not yet normalized
fn is_transport_rejection(response: &Response) -> bool {
    matches!(
        response.status(),
        StatusCode::REQUEST_TIMEOUT | StatusCode::PAYLOAD_TOO_LARGE
    ) && response.extensions().get::<Normalized>().is_none()
}

/// Middleware function installing an [`ErrorNormalizer`]
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn normalize_errors(
    State(normalizer): State<ErrorNormalizer>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if let Some(error) = response.extensions().get::<ApiError>() {
        return normalizer.normalize(error);
    }

    if is_transport_rejection(&response) {
        return normalizer.normalize(&ApiError::from_transport_status(response.status()));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ApiOperation;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn failing() -> Result<&'static str, ApiError> {
        Err(ApiError::new(ApiOperation::List, "Storage offline")
            .with_source(anyhow::anyhow!("connection refused")))
    }

    async fn rejected() -> Result<&'static str, ApiError> {
        Err(ApiError::new(ApiOperation::Create, "Expected JSON")
            .with_status(StatusCode::BAD_REQUEST))
    }

    async fn too_large() -> Result<&'static str, ApiError> {
        Err(ApiError::new(ApiOperation::Create, "Payload too large")
            .with_status(StatusCode::PAYLOAD_TOO_LARGE))
    }

    fn router(disclose: bool) -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route("/fail", get(failing))
            .route("/reject", get(rejected))
            .route("/timeout", get(|| async { StatusCode::REQUEST_TIMEOUT }))
            .route("/too-large", get(too_large))
            .layer(middleware::from_fn_with_state(
                ErrorNormalizer::new(disclose),
                normalize_errors,
            ))
    }

    async fn call(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_withheld_stack_is_null() {
        let (status, bytes) = call(router(false), "/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Storage offline");
        assert!(body.get("stack").is_some());
        assert!(body["stack"].is_null());
    }

    #[tokio::test]
    async fn test_disclosed_stack_is_non_empty() {
        let (status, bytes) = call(router(true), "/fail").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let body: NormalizedError = serde_json::from_slice(&bytes).unwrap();
        let stack = body.stack.unwrap();
        assert!(!stack.is_empty());
        assert!(stack.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_explicit_status_is_kept() {
        let (status, bytes) = call(router(false), "/reject").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: NormalizedError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            NormalizedError {
                message: "Expected JSON".to_string(),
                stack: None,
            }
        );
    }

    #[tokio::test]
    async fn test_bare_transport_rejection_is_normalized() {
        let (status, bytes) = call(router(true), "/timeout").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

        let body: NormalizedError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Request timed out");
        assert!(body.stack.unwrap().contains("transport layer"));
    }

    #[tokio::test]
    async fn test_normalized_response_is_not_rewritten_again() {
        let outer = router(false).layer(middleware::from_fn_with_state(
            ErrorNormalizer::new(true),
            normalize_errors,
        ));

        let (status, bytes) = call(outer, "/too-large").await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let body: NormalizedError = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Payload too large");
        assert!(body.stack.is_none());
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let (status, bytes) = call(router(true), "/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"fine");
    }

    #[test]
    fn test_body_respects_flag() {
        let error = ApiError::internal("boom");
        assert!(ErrorNormalizer::new(false).body(&error).stack.is_none());
        assert!(ErrorNormalizer::new(true).body(&error).stack.is_some());
        assert!(ErrorNormalizer::new(true).discloses_diagnostics());
    }
}
