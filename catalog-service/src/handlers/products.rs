//! Product CRUD handlers
//!
//! One handler set, generic over the storage backend. Missing products are
//! answered here with a 404; every other failure is returned as an
//! [`ApiError`] for the normalizer.

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{ApiError, ApiOperation};
use super::query::ProductFilter;
use crate::ids::ProductId;
use crate::models::{NewProduct, Product, ProductChanges};
use crate::repository::ProductRepository;
use crate::responses::{Created, Message, NotFound};
use crate::state::AppState;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Body of `GET /products`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductList {
    pub page: u64,
    pub total_results: u64,
    pub products: Vec<Product>,
}

/// Body of `POST /products`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductCreated {
    pub message: String,
    pub product_id: ProductId,
}

/// `GET /products`: filtered, paginated listing
///
/// A query string that can't be decoded is treated as empty, so the listing
/// falls back to its defaults instead of failing.
pub async fn list_products<R: ProductRepository>(
    State(state): State<AppState<R>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<ProductList>, ApiError> {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!("Ignoring undecodable query string: {}", rejection.body_text());
            HashMap::new()
        }
    };

    let filter = ProductFilter::from_params(&params);
    let conditions = filter.conditions();
    debug!(
        page = filter.page,
        limit = filter.limit,
        conditions = conditions.len(),
        "Listing products"
    );

    let repository = state.repository();
    let products = repository
        .find_all(&conditions, Some(filter.pagination()))
        .await?;
    let total_results = repository.count(&conditions).await?;

    Ok(Json(ProductList {
        page: filter.page,
        total_results,
        products,
    }))
}

/// `GET /products/{id}`
pub async fn get_product<R: ProductRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = path.map_err(|rejection| rejected(rejection, ApiOperation::Get))?;

    match state.repository().find_by_id(&id).await? {
        Some(product) => Ok(Json(product).into_response()),
        None => Ok(NotFound::new(PRODUCT_NOT_FOUND).into_response()),
    }
}

/// `POST /products`
pub async fn create_product<R: ProductRepository>(
    State(state): State<AppState<R>>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<Created<ProductCreated>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| rejected(rejection, ApiOperation::Create))?;

    let product = state.repository().create(payload).await?;
    info!(product_id = %product.id, category = %product.category, "Product created");

    let base_path = state.config().service.base_path.trim_end_matches('/');
    let location = format!("{}/products/{}", base_path, product.id);

    Ok(Created::new(ProductCreated {
        message: "Product created successfully".to_string(),
        product_id: product.id,
    })
    .with_location(location))
}

/// `PUT /products/{id}`: partial update of price, availability, description
pub async fn update_product<R: ProductRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ProductChanges>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = path.map_err(|rejection| rejected(rejection, ApiOperation::Update))?;
    let Json(changes) = payload.map_err(|rejection| rejected(rejection, ApiOperation::Update))?;

    match state.repository().update(&id, changes).await? {
        Some(product) => {
            info!(product_id = %product.id, "Product updated");
            Ok(Message::new("Product updated successfully").into_response())
        }
        None => Ok(NotFound::new(PRODUCT_NOT_FOUND).into_response()),
    }
}

/// `DELETE /products/{id}`
pub async fn delete_product<R: ProductRepository>(
    State(state): State<AppState<R>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = path.map_err(|rejection| rejected(rejection, ApiOperation::Delete))?;

    if state.repository().delete(&id).await? {
        info!(product_id = %id, "Product deleted");
        Ok(Message::new("Product deleted successfully").into_response())
    } else {
        Ok(NotFound::new(PRODUCT_NOT_FOUND).into_response())
    }
}

/// Extractor rejection tagged with the operation it interrupted
fn rejected(rejection: impl Into<ApiError>, operation: ApiOperation) -> ApiError {
    rejection.into().with_operation(operation)
}
