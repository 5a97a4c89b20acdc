//! Middleware for error normalization and request tracking

pub mod normalizer;
pub mod request_tracking;

pub use normalizer::{normalize_errors, ErrorNormalizer, NormalizedError};
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, SENSITIVE_HEADERS,
};
