//! Product catalog HTTP service
//!
//! A JSON API over a catalog of products: filtered and paginated listing,
//! single-item retrieval, creation, partial update and deletion, plus a
//! distinct category listing.
//!
//! Two pieces carry the decision logic:
//!
//! - [`handlers::ProductFilter`] turns untrusted query parameters into bounded
//!   repository filters and a page window. It never fails; bad input falls
//!   back to defaults.
//! - [`middleware::ErrorNormalizer`] wraps every route and renders failures as
//!   `{ "message", "stack" }`, disclosing diagnostic traces only when
//!   configured to.
//!
//! Storage is reached through [`repository::ProductRepository`];
//! [`repository::MemoryRepository`] is the bundled backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let normalizer = ErrorNormalizer::new(config.disclose_diagnostics());
//!     let state = AppState::new(config.clone(), MemoryRepository::new());
//!
//!     Server::new(config).serve(build_router(state, normalizer)).await
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod responses;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::build_router;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{ApiError, ApiOperation, ProductFilter};
    pub use crate::health::{health, readiness};
    pub use crate::ids::{MakeTypedRequestId, ProductId, RequestId};
    pub use crate::middleware::{ErrorNormalizer, NormalizedError};
    pub use crate::models::{Availability, NewProduct, Product, ProductChanges};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        CategorySource, FilterCondition, MemoryRepository, Pagination, ProductRepository,
        Repository, RepositoryError,
    };
    pub use crate::responses::{Created, Message, NotFound};
    pub use crate::server::Server;
    pub use crate::state::AppState;

    pub use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{delete, get, post, put},
        Json, Router,
    };
    pub use serde::{Deserialize, Serialize};
    pub use tokio;
    pub use tracing::{debug, error, info, warn};
}
