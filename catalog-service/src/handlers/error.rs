//! API error type for handler failures
//!
//! Handlers return `Result<_, ApiError>`. Rendering an `ApiError` produces a
//! provisional response that carries the error itself in its extensions; the
//! [`ErrorNormalizer`](crate::middleware::ErrorNormalizer) picks it up and
//! writes the final `{ message, stack }` body.
//!
//! # Example
//!
//! ```rust
//! use axum::http::StatusCode;
//! use catalog_service::handlers::{ApiError, ApiOperation};
//!
//! let error = ApiError::internal("Storage offline").with_operation(ApiOperation::List);
//! assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
//! assert!(error.status.is_none());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
use crate::responses::MessageBody;

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing products
    List,
    /// Getting a single product by ID
    Get,
    /// Creating a new product
    Create,
    /// Updating an existing product
    Update,
    /// Deleting a product
    Delete,
    /// Listing categories
    Categories,
    /// Request handling outside any specific operation
    Request,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Categories => write!(f, "categories"),
            Self::Request => write!(f, "request"),
        }
    }
}

impl From<RepositoryOperation> for ApiOperation {
    fn from(op: RepositoryOperation) -> Self {
        match op {
            RepositoryOperation::FindById => Self::Get,
            RepositoryOperation::FindAll | RepositoryOperation::Count => Self::List,
            RepositoryOperation::Create => Self::Create,
            RepositoryOperation::Update => Self::Update,
            RepositoryOperation::Delete => Self::Delete,
            RepositoryOperation::Categories => Self::Categories,
        }
    }
}

/// A failed request
///
/// `status` is only set for failures that know their HTTP status (extractor
/// and transport rejections). Everything else is reported as 500.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// Explicit HTTP status, if the failure carries one
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
    /// Underlying cause, used for diagnostics
    pub source: Option<Arc<anyhow::Error>>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with no explicit status
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Request, message)
    }

    /// Build an error from a caught handler panic
    ///
    /// The panic payload becomes the diagnostic cause.
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "unknown panic payload".to_string()
        };

        Self::internal("Internal server error")
            .with_source(anyhow::anyhow!("handler panicked: {detail}"))
    }

    /// Build an error for a request a transport layer turned away before any
    /// handler ran: a timeout (408) or an oversized body (413)
    pub fn from_transport_status(status: StatusCode) -> Self {
        let message = match status {
            StatusCode::REQUEST_TIMEOUT => "Request timed out",
            StatusCode::PAYLOAD_TOO_LARGE => "Request entity too large",
            _ => status.canonical_reason().unwrap_or("Request failed"),
        };

        Self::internal(message)
            .with_status(status)
            .with_source(anyhow::anyhow!("request rejected by transport layer: {status}"))
    }

    /// Attach an explicit HTTP status
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(Arc::new(source.into()));
        self
    }

    /// Status the error is reported with: the explicit one, else 500
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Multi-line diagnostic trace: the error, then each cause in turn
    ///
    /// Never empty.
    pub fn diagnostic_trace(&self) -> String {
        let mut trace = format!("ApiError during {}: {}", self.operation, self.message);
        if let Some(source) = &self.source {
            for cause in source.chain() {
                trace.push_str("\n    caused by: ");
                trace.push_str(&cause.to_string());
            }
        }
        trace
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error during {}: {}", self.operation, self.message)?;
        if let Some(status) = self.status {
            write!(f, " ({})", status.as_u16())?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = MessageBody {
            message: self.message.clone(),
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = ApiOperation::from(err.operation);

        // Don't expose storage internals; validation and identifier problems
        // are about the caller's input and are safe to echo.
        let message = match err.kind {
            RepositoryErrorKind::ValidationFailed | RepositoryErrorKind::InvalidIdentifier => {
                err.message.clone()
            }
            RepositoryErrorKind::Unavailable => "An internal error occurred".to_string(),
        };

        Self::new(operation, message).with_source(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let message = rejection.body_text();

        Self::new(ApiOperation::Request, message)
            .with_status(status)
            .with_source(rejection)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let status = rejection.status();
        let message = rejection.body_text();

        Self::new(ApiOperation::Request, message)
            .with_status(status)
            .with_source(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_operation_display() {
        assert_eq!(ApiOperation::List.to_string(), "list");
        assert_eq!(ApiOperation::Categories.to_string(), "categories");
        assert_eq!(ApiOperation::Request.to_string(), "request");
    }

    #[test]
    fn test_repository_operation_mapping() {
        assert_eq!(ApiOperation::from(RepositoryOperation::Count), ApiOperation::List);
        assert_eq!(ApiOperation::from(RepositoryOperation::FindById), ApiOperation::Get);
        assert_eq!(ApiOperation::from(RepositoryOperation::Delete), ApiOperation::Delete);
    }

    #[test]
    fn test_default_status_is_500() {
        let error = ApiError::internal("boom");
        assert!(error.status.is_none());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let error = error.with_status(StatusCode::BAD_REQUEST);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_repository_error_has_no_status() {
        let err =
            RepositoryError::invalid_identifier(RepositoryOperation::FindById, "Product", "42");
        let api: ApiError = err.into();
        assert_eq!(api.operation, ApiOperation::Get);
        assert!(api.status.is_none());
        assert_eq!(api.message, "Malformed Product identifier");
        assert!(api.source.is_some());
    }

    #[test]
    fn test_from_repository_error_hides_storage_details() {
        let err =
            RepositoryError::unavailable(RepositoryOperation::FindAll, "socket closed at 10.0.0.3");
        let api: ApiError = err.into();
        assert_eq!(api.message, "An internal error occurred");
        assert!(api.diagnostic_trace().contains("socket closed at 10.0.0.3"));
    }

    #[test]
    fn test_diagnostic_trace_includes_chain() {
        let root = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = ApiError::new(ApiOperation::Create, "Could not store product")
            .with_source(anyhow::Error::new(root).context("writing catalog"));

        let trace = error.diagnostic_trace();
        assert!(trace.starts_with("ApiError during create: Could not store product"));
        assert!(trace.contains("caused by: writing catalog"));
        assert!(trace.contains("caused by: disk full"));
    }

    #[test]
    fn test_diagnostic_trace_never_empty() {
        assert!(!ApiError::internal("").diagnostic_trace().is_empty());
    }

    #[test]
    fn test_from_panic_payloads() {
        let error = ApiError::from_panic(Box::new("static str"));
        assert!(error.diagnostic_trace().contains("handler panicked: static str"));

        let error = ApiError::from_panic(Box::new(String::from("owned")));
        assert!(error.diagnostic_trace().contains("handler panicked: owned"));

        let error = ApiError::from_panic(Box::new(42_u8));
        assert!(error.diagnostic_trace().contains("unknown panic payload"));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_transport_status() {
        let error = ApiError::from_transport_status(StatusCode::REQUEST_TIMEOUT);
        assert_eq!(error.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(error.message, "Request timed out");
        assert!(error.diagnostic_trace().contains("408 Request Timeout"));

        let error = ApiError::from_transport_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.message, "Request entity too large");
    }

    #[test]
    fn test_into_response_carries_error() {
        let response = ApiError::internal("boom")
            .with_status(StatusCode::UNPROCESSABLE_ENTITY)
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let carried = response.extensions().get::<ApiError>().unwrap();
        assert_eq!(carried.message, "boom");
    }
}
