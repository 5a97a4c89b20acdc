//! Router assembly
//!
//! [`build_router`] wires the catalog routes under the configured base path,
//! adds the health probes and fallbacks, and wraps everything in panic
//! recovery and the [`ErrorNormalizer`]. Transport concerns (CORS, timeouts,
//! tracing) are added by [`Server`](crate::server::Server).

use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use http::StatusCode;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handlers::{
    create_product, delete_product, get_product, list_categories, list_products, update_product,
    ApiError,
};
use crate::health::{health, readiness};
use crate::middleware::{normalize_errors, ErrorNormalizer};
use crate::repository::ProductRepository;
use crate::responses::{MessageBody, NotFound};
use crate::state::AppState;

/// Build the application router
pub fn build_router<R: ProductRepository>(
    state: AppState<R>,
    normalizer: ErrorNormalizer,
) -> Router {
    let base_path = normalize_base_path(&state.config().service.base_path);

    let catalog = Router::new()
        .route(
            "/products",
            get(list_products::<R>).post(create_product::<R>),
        )
        .route(
            "/products/{id}",
            get(get_product::<R>)
                .put(update_product::<R>)
                .delete(delete_product::<R>),
        )
        .route("/categories", get(list_categories::<R>));

    let router = match base_path {
        Some(path) => Router::new().nest(&path, catalog),
        None => catalog,
    };

    router
        .route("/health", get(health::<R>))
        .route("/ready", get(readiness::<R>))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(normalizer, normalize_errors))
}

/// `"/api/"` -> `Some("/api")`, `"api"` -> `Some("/api")`, `"/"` or `""` -> `None`
fn normalize_base_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("/{}", trimmed))
}

async fn route_not_found() -> NotFound {
    NotFound::new("Route not found")
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        axum::Json(MessageBody {
            message: "Method not allowed".to_string(),
        }),
    )
        .into_response()
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::from_panic(payload).into_response()
}
