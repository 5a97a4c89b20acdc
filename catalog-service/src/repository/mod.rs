//! Storage abstractions for the catalog
//!
//! The HTTP layer only talks to storage through the traits in this module:
//!
//! - **CRUD**: [`Repository`] for find, count, create, update, delete
//! - **Categories**: [`CategorySource`] for the distinct category listing
//! - **Filtering**: [`FilterCondition`] describing field predicates
//! - **Pagination**: [`Pagination`] describing the result window
//!
//! [`MemoryRepository`] is the bundled backend.
//!
//! # Example
//!
//! ```rust
//! use catalog_service::repository::{FilterCondition, MemoryRepository, Pagination, Repository};
//! use catalog_service::models::NewProduct;
//!
//! # tokio_test_block(async {
//! let repo = MemoryRepository::new();
//! repo.create(NewProduct {
//!     name: Some("Book A".into()),
//!     price: Some(100.0),
//!     category: Some("Books".into()),
//!     description: Some("A book".into()),
//!     images: vec![],
//! })
//! .await
//! .unwrap();
//!
//! let filters = [FilterCondition::eq("category", "Books")];
//! let page = repo.find_all(&filters, Some(Pagination::page(1, 10))).await.unwrap();
//! assert_eq!(page.len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod memory;
mod pagination;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryRepository;
pub use pagination::{FilterCondition, FilterOperator, FilterValue, Filterable, Pagination};
pub use traits::{CategorySource, ProductRepository, Repository, RepositoryResult};
