//! Pagination and filtering types for repository queries
//!
//! Handlers describe *what* they want with [`FilterCondition`]s and a
//! [`Pagination`] window; backends decide how to evaluate them. The in-memory
//! backend evaluates conditions directly against entities that implement
//! [`Filterable`].
//!
//! # Example
//!
//! ```rust
//! use catalog_service::repository::{FilterCondition, Pagination};
//!
//! let filters = vec![
//!     FilterCondition::eq("category", "Books"),
//!     FilterCondition::lte("price", 150.0),
//! ];
//! let pagination = Pagination::page(2, 10);
//! assert_eq!(pagination.offset, 10);
//! # let _ = filters;
//! ```

use std::cmp::Ordering;

/// Pagination parameters for limiting query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create pagination for a specific page number (1-indexed)
    ///
    /// Page `0` is treated as the first page. The offset saturates instead of
    /// overflowing for absurd page numbers, which simply yields an empty page.
    ///
    /// ```rust
    /// use catalog_service::repository::Pagination;
    ///
    /// let page3 = Pagination::page(3, 20);
    /// assert_eq!(page3.offset, 40);
    /// assert_eq!(page3.limit, 20);
    ///
    /// assert_eq!(Pagination::page(u64::MAX, 100).offset, u64::MAX);
    /// ```
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }

    /// Apply this window to an iterator
    pub fn apply<I: Iterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.skip(offset).take(limit)
    }
}

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Case-insensitive literal substring match
    ContainsIgnoreCase,
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit floating point value
    Float(f64),
}

impl FilterValue {
    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

/// A single filter condition for querying entities
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a greater-than-or-equal filter (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// Create a less-than-or-equal filter (field <= value)
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// Create a case-insensitive substring filter
    ///
    /// The needle is matched literally. Characters such as `.` or `(` have no
    /// special meaning.
    pub fn contains_ignore_case(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOperator::ContainsIgnoreCase,
            FilterValue::String(needle.into()),
        )
    }

    /// Evaluate this condition against a field's value
    ///
    /// Mismatched value types never match.
    pub fn matches(&self, actual: &FilterValue) -> bool {
        match self.operator {
            FilterOperator::Equal => actual.compare(&self.value) == Some(Ordering::Equal),
            FilterOperator::GreaterThanOrEqual => matches!(
                actual.compare(&self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOperator::LessThanOrEqual => matches!(
                actual.compare(&self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOperator::ContainsIgnoreCase => match (actual, &self.value) {
                (FilterValue::String(haystack), FilterValue::String(needle)) => haystack
                    .to_lowercase()
                    .contains(needle.to_lowercase().as_str()),
                _ => false,
            },
        }
    }
}

/// Entities whose fields can be evaluated by [`FilterCondition`]s in memory
pub trait Filterable {
    /// Value of the named field, or `None` if the entity has no such field
    fn field_value(&self, field: &str) -> Option<FilterValue>;

    /// Whether this entity satisfies every condition
    ///
    /// An empty condition list matches everything. A condition on an unknown
    /// field matches nothing.
    fn matches_all(&self, filters: &[FilterCondition]) -> bool {
        filters.iter().all(|condition| {
            self.field_value(&condition.field)
                .is_some_and(|actual| condition.matches(&actual))
        })
    }
}
