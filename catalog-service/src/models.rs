//! Catalog domain types
//!
//! [`Product`] is the stored entity. [`NewProduct`] and [`ProductChanges`] are
//! the request payloads for create and partial update; their fields are
//! optional on the wire so that missing values reach the repository's
//! validation instead of failing JSON decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::ProductId;
use crate::repository::{FilterValue, Filterable};

/// Stock state of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    InStock,
    OutOfStock,
    PreOrder,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::PreOrder => "pre_order",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog item as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub availability: Availability,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Filterable for Product {
    fn field_value(&self, field: &str) -> Option<FilterValue> {
        match field {
            "id" => Some(self.id.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            "price" => Some(self.price.into()),
            "category" => Some(self.category.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            "availability" => Some(self.availability.as_str().into()),
            _ => None,
        }
    }
}

/// Create payload: `{ name, price, category, description, images }`
///
/// Availability is not accepted on create; new products start `in_stock`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial update payload: any subset of `{ price, availability, description }`
///
/// Absent fields are left untouched. Other fields in the body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductChanges {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub availability: Option<Availability>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.availability.is_none() && self.description.is_none()
    }
}
