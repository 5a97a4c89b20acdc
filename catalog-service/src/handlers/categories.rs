//! Category listing handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::repository::ProductRepository;
use crate::state::AppState;

/// Body of `GET /categories`
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

/// `GET /categories`: distinct categories in use, sorted
pub async fn list_categories<R: ProductRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<CategoryList>, ApiError> {
    let categories = state.repository().categories().await?;
    Ok(Json(CategoryList { categories }))
}
