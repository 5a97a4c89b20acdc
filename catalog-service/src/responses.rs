//! HTTP response builders with correct status codes
//!
//! - **200 OK** with a `{ "message" }` body: [`Message`]
//! - **201 Created** with an optional `Location` header: [`Created`]
//! - **404 Not Found** with a `{ "message" }` body: [`NotFound`]
//!
//! Failures that need normalizing go through
//! [`ApiError`](crate::handlers::ApiError) instead.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Body shape shared by the message-only responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

// ============================================================================
// 200 OK
// ============================================================================

/// HTTP 200 response carrying only a confirmation message
#[derive(Debug, Clone)]
pub struct Message(pub String);

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl IntoResponse for Message {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(MessageBody { message: self.0 })).into_response()
    }
}

// ============================================================================
// 201 Created
// ============================================================================

/// HTTP 201 Created response
///
/// Optionally includes a `Location` header pointing to the new resource.
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(location) = self.location {
            if let Ok(header_value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, header_value);
            }
        }

        response
    }
}

// ============================================================================
// 404 Not Found
// ============================================================================

/// HTTP 404 response for a missing resource
///
/// Produced by handlers directly; it is an expected outcome, not a failure,
/// so the error normalizer leaves it untouched.
#[derive(Debug, Clone)]
pub struct NotFound(pub String);

impl NotFound {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, Json(MessageBody { message: self.0 })).into_response()
    }
}
