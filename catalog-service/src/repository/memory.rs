//! In-memory product storage
//!
//! Products are kept in insertion order so that listing is stable across
//! pages. All state lives behind a single `tokio::sync::RwLock`; reads run
//! concurrently and writes are serialized.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{FilterCondition, Filterable, Pagination};
use super::traits::{CategorySource, Repository, RepositoryResult};
use crate::ids::ProductId;
use crate::models::{NewProduct, Product, ProductChanges};

const ENTITY: &str = "Product";

#[derive(Debug, Default)]
struct Catalog {
    next_seq: u64,
    /// Insertion sequence -> product
    products: BTreeMap<u64, Product>,
    index: HashMap<ProductId, u64>,
}

impl Catalog {
    fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).and_then(|seq| self.products.get(seq))
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        let seq = self.index.get(id)?;
        self.products.get_mut(seq)
    }

    fn matching<'a>(
        &'a self,
        filters: &'a [FilterCondition],
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .values()
            .filter(move |product| product.matches_all(filters))
    }
}

/// Reference storage backend holding the catalog in process memory
///
/// Cloning is cheap and clones share the same catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    catalog: Arc<RwLock<Catalog>>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products
    pub async fn len(&self) -> usize {
        self.catalog.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn parse_id(operation: RepositoryOperation, raw: &str) -> RepositoryResult<ProductId> {
    raw.parse()
        .map_err(|_| RepositoryError::invalid_identifier(operation, ENTITY, raw))
}

fn validation_error(operation: RepositoryOperation, violations: &[String]) -> RepositoryError {
    RepositoryError::validation_failed(
        operation,
        format!("{} validation failed: {}", ENTITY, violations.join(", ")),
    )
}

fn check_price(price: f64, violations: &mut Vec<String>) {
    if !price.is_finite() {
        violations.push("price: Price must be a finite number".to_string());
    } else if price < 0.0 {
        violations.push("price: Price must be a positive value".to_string());
    }
}

/// Validate a create payload and build the stored product
fn build_product(data: NewProduct) -> RepositoryResult<Product> {
    let mut violations = Vec::new();

    let name = data
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    if name.is_none() {
        violations.push("name: Product name is required".to_string());
    }

    match data.price {
        Some(price) => check_price(price, &mut violations),
        None => violations.push("price: Product price is required".to_string()),
    }

    let category = data.category.filter(|c| !c.is_empty());
    if category.is_none() {
        violations.push("category: Product category is required".to_string());
    }

    let description = data.description.filter(|d| !d.is_empty());
    if description.is_none() {
        violations.push("description: Product description is required".to_string());
    }

    match (name, data.price, category, description) {
        (Some(name), Some(price), Some(category), Some(description)) if violations.is_empty() => {
            let now = Utc::now();
            Ok(Product {
                id: ProductId::new(),
                name,
                price,
                category,
                description,
                availability: Default::default(),
                images: data.images,
                created_at: now,
                updated_at: now,
            })
        }
        _ => Err(validation_error(RepositoryOperation::Create, &violations)),
    }
}

fn check_changes(changes: &ProductChanges) -> RepositoryResult<()> {
    let mut violations = Vec::new();

    if let Some(price) = changes.price {
        check_price(price, &mut violations);
    }
    if changes.description.as_deref() == Some("") {
        violations.push("description: Product description is required".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(validation_error(RepositoryOperation::Update, &violations))
    }
}

impl Repository<str, Product, NewProduct, ProductChanges> for MemoryRepository {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Product>> {
        let id = parse_id(RepositoryOperation::FindById, id)?;
        let catalog = self.catalog.read().await;
        Ok(catalog.get(&id).cloned())
    }

    async fn find_all(
        &self,
        filters: &[FilterCondition],
        pagination: Option<Pagination>,
    ) -> RepositoryResult<Vec<Product>> {
        let catalog = self.catalog.read().await;
        let matching = catalog.matching(filters).cloned();

        Ok(match pagination {
            Some(window) => window.apply(matching).collect(),
            None => matching.collect(),
        })
    }

    async fn count(&self, filters: &[FilterCondition]) -> RepositoryResult<u64> {
        let catalog = self.catalog.read().await;
        Ok(catalog.matching(filters).count() as u64)
    }

    async fn create(&self, data: NewProduct) -> RepositoryResult<Product> {
        let product = build_product(data)?;

        let mut catalog = self.catalog.write().await;
        let seq = catalog.next_seq;
        catalog.next_seq += 1;
        catalog.index.insert(product.id.clone(), seq);
        catalog.products.insert(seq, product.clone());

        tracing::debug!(product_id = %product.id, "Stored product");
        Ok(product)
    }

    async fn update(&self, id: &str, data: ProductChanges) -> RepositoryResult<Option<Product>> {
        let id = parse_id(RepositoryOperation::Update, id)?;
        check_changes(&data)?;

        let mut catalog = self.catalog.write().await;
        let Some(product) = catalog.get_mut(&id) else {
            return Ok(None);
        };

        if data.is_empty() {
            tracing::debug!(product_id = %id, "Update carries no changes");
            return Ok(Some(product.clone()));
        }

        if let Some(price) = data.price {
            product.price = price;
        }
        if let Some(availability) = data.availability {
            product.availability = availability;
        }
        if let Some(description) = data.description {
            product.description = description;
        }
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let id = parse_id(RepositoryOperation::Delete, id)?;

        let mut catalog = self.catalog.write().await;
        let Some(seq) = catalog.index.remove(&id) else {
            return Ok(false);
        };
        catalog.products.remove(&seq);

        tracing::debug!(product_id = %id, "Removed product");
        Ok(true)
    }
}

impl CategorySource for MemoryRepository {
    async fn categories(&self) -> RepositoryResult<Vec<String>> {
        let catalog = self.catalog.read().await;
        let distinct: BTreeSet<&str> = catalog
            .products
            .values()
            .map(|product| product.category.as_str())
            .collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }
}
