//! Repository trait definitions
//!
//! Traits use RPITIT (Return Position Impl Trait In Traits) so implementations
//! can be written with plain `async fn` while callers still get `Send` futures
//! that axum handlers can hold.
//!
//! - [`Repository`]: generic CRUD over an entity
//! - [`CategorySource`]: distinct category listing
//! - [`ProductRepository`]: everything the catalog HTTP layer needs

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{FilterCondition, Pagination};
use crate::models::{NewProduct, Product, ProductChanges};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
///
/// # Type Parameters
///
/// - `Id`: the identifier type as received from callers. Unsized types such as
///   `str` are allowed so raw path segments can be handed over unparsed; the
///   backend decides what a well-formed identifier is.
/// - `Entity`: the full entity type returned from queries
/// - `Create`: the payload for creating new entities
/// - `Update`: the payload for partially updating existing entities
///
/// Absence is never an error: lookups, updates and deletes of a missing
/// entity report `None` / `false` and leave the response to the caller.
pub trait Repository<Id: ?Sized, Entity, Create, Update>: Send + Sync {
    /// Find an entity by its unique identifier
    ///
    /// # Errors
    ///
    /// `InvalidIdentifier` when `id` is not well-formed.
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Find entities matching every filter, in storage order, within the
    /// optional pagination window
    fn find_all(
        &self,
        filters: &[FilterCondition],
        pagination: Option<Pagination>,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Count all entities matching every filter, ignoring pagination
    fn count(
        &self,
        filters: &[FilterCondition],
    ) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Create a new entity
    ///
    /// Returns the created entity with generated fields (ID, timestamps).
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when required fields are missing or out of range.
    fn create(&self, data: Create) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Apply a partial update and return the updated entity
    ///
    /// Returns `Ok(None)` if the entity doesn't exist.
    fn update(
        &self,
        id: &Id,
        data: Update,
    ) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Delete an entity by its identifier
    ///
    /// Returns `true` if the entity was deleted, `false` if it didn't exist.
    fn delete(&self, id: &Id) -> impl Future<Output = RepositoryResult<bool>> + Send;
}

/// Source of the distinct categories currently in use
pub trait CategorySource: Send + Sync {
    /// Distinct category names, sorted ascending
    fn categories(&self) -> impl Future<Output = RepositoryResult<Vec<String>>> + Send;
}

/// Storage capability required by the catalog handlers
///
/// Blanket-implemented for every type that provides both traits, so backends
/// only implement [`Repository`] and [`CategorySource`].
pub trait ProductRepository:
    Repository<str, Product, NewProduct, ProductChanges> + CategorySource + 'static
{
}

impl<T> ProductRepository for T where
    T: Repository<str, Product, NewProduct, ProductChanges> + CategorySource + 'static
{
}
