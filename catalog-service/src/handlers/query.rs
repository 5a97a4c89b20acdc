//! Query parameters for the product listing
//!
//! [`ProductFilter::from_params`] turns the raw, untrusted query string into
//! a bounded description of the listing: field predicates plus a page window.
//! It never fails. Anything it can't make sense of falls back to a default or
//! is left out.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use catalog_service::handlers::ProductFilter;
//!
//! let params: HashMap<String, String> = [
//!     ("category", "  Books  "),
//!     ("price_max", "150"),
//!     ("page", "0"),
//!     ("limit", "500"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let filter = ProductFilter::from_params(&params);
//! assert_eq!(filter.category.as_deref(), Some("Books"));
//! assert_eq!(filter.price_max, Some(150.0));
//! assert_eq!(filter.page, 1);
//! assert_eq!(filter.limit, 100);
//! ```

use std::collections::HashMap;

use crate::repository::{FilterCondition, Pagination};

/// Page used when `page` is missing or invalid
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when `limit` is missing or invalid
pub const DEFAULT_LIMIT: u64 = 10;

/// Upper bound for `limit`
pub const MAX_LIMIT: u64 = 100;

/// Validated listing query
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    /// Exact category match, trimmed and non-empty
    pub category: Option<String>,
    /// Inclusive lower price bound
    pub price_min: Option<f64>,
    /// Inclusive upper price bound
    pub price_max: Option<f64>,
    /// Case-insensitive literal substring of the product name
    pub name_search: Option<String>,
    /// 1-based page number
    pub page: u64,
    /// Page size in `1..=MAX_LIMIT`
    pub limit: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            price_min: None,
            price_max: None,
            name_search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductFilter {
    /// Build a filter from raw query parameters
    ///
    /// Recognized keys are `category`, `price_min`, `price_max`, `search`,
    /// `page` and `limit`. Other keys are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let param = |key: &str| params.get(key).map(String::as_str);

        let page = param("page")
            .and_then(parse_positive_int)
            .unwrap_or(DEFAULT_PAGE);
        let limit = param("limit")
            .and_then(parse_positive_int)
            .map_or(DEFAULT_LIMIT, |limit| limit.min(MAX_LIMIT));

        Self {
            category: param("category").and_then(non_empty_trimmed),
            price_min: param("price_min").and_then(parse_finite),
            price_max: param("price_max").and_then(parse_finite),
            name_search: param("search").and_then(non_empty_trimmed),
            page,
            limit,
        }
    }

    /// Number of matching items skipped before this page
    pub fn skip(&self) -> u64 {
        self.pagination().offset
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::page(self.page, self.limit)
    }

    /// Lower the field predicates into repository filter conditions
    pub fn conditions(&self) -> Vec<FilterCondition> {
        let mut conditions = Vec::new();

        if let Some(category) = &self.category {
            conditions.push(FilterCondition::eq("category", category.as_str()));
        }
        if let Some(min) = self.price_min {
            conditions.push(FilterCondition::gte("price", min));
        }
        if let Some(max) = self.price_max {
            conditions.push(FilterCondition::lte("price", max));
        }
        if let Some(search) = &self.name_search {
            conditions.push(FilterCondition::contains_ignore_case("name", search.as_str()));
        }

        conditions
    }
}

fn non_empty_trimmed(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse the leading base-10 integer of `raw`, keeping it only if positive
///
/// Leading whitespace and a single sign are accepted, the longest run of
/// ASCII digits is taken and anything after it is ignored, so `"3.7"` is 3
/// and `"5abc"` is 5. Magnitudes beyond `u64::MAX` saturate.
fn parse_positive_int(raw: &str) -> Option<u64> {
    let rest = raw.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen_digit = false;
    let mut value: u64 = 0;
    for digit in digits {
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(digit - b'0'));
    }

    (seen_digit && !negative && value > 0).then_some(value)
}
