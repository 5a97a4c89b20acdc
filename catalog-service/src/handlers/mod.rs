//! HTTP handlers for the catalog
//!
//! - **Products**: list, get, create, update, delete
//! - **Categories**: distinct category listing
//! - **Query building**: [`ProductFilter`] turns raw query parameters into
//!   repository filters and a page window
//! - **Errors**: [`ApiError`], rendered by the error normalizer
//!
//! Handlers are generic over [`ProductRepository`](crate::repository::ProductRepository)
//! and are wired into a router by [`build_router`](crate::app::build_router).

mod categories;
mod error;
mod products;
mod query;

pub use categories::{list_categories, CategoryList};
pub use error::{ApiError, ApiOperation};
pub use products::{
    create_product, delete_product, get_product, list_products, update_product, ProductCreated,
    ProductList, PRODUCT_NOT_FOUND,
};
pub use query::{ProductFilter, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
