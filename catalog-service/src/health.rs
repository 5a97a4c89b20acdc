//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::repository::ProductRepository;
use crate::state::AppState;

const STORAGE_UNAVAILABLE: &str = "Storage unavailable";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub healthy: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe
///
/// Always returns 200 OK if the service is running.
pub async fn health<R: ProductRepository>(State(state): State<AppState<R>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// Runs a trivial count against storage. Returns 503 Service Unavailable if
/// storage can't answer. The storage error text is only reported when
/// diagnostics are disclosed.
pub async fn readiness<R: ProductRepository>(
    State(state): State<AppState<R>>,
) -> impl IntoResponse {
    let storage = match state.repository().count(&[]).await {
        Ok(_) => DependencyStatus {
            healthy: true,
            message: None,
        },
        Err(e) => {
            tracing::warn!("Storage readiness check failed: {}", e);
            let message = if state.config().disclose_diagnostics() {
                e.to_string()
            } else {
                STORAGE_UNAVAILABLE.to_string()
            };
            DependencyStatus {
                healthy: false,
                message: Some(message),
            }
        }
    };

    let ready = storage.healthy;
    let mut dependencies = HashMap::new();
    dependencies.insert("storage".to_string(), storage);

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repository::MemoryRepository;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_health_reports_service_name() {
        let state = AppState::new(Config::default(), MemoryRepository::new());
        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "catalog-service");
        assert_eq!(body.version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn test_readiness_with_memory_storage() {
        let state = AppState::new(Config::default(), MemoryRepository::new());
        let response = readiness(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ReadinessResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.ready);
        assert!(body.dependencies["storage"].healthy);
    }
}
