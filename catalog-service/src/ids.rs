//! Type-safe identifiers using the TypeID specification
//!
//! Identifiers combine a short, human-readable prefix with a base32-encoded
//! UUIDv7, so they sort by creation time and can't be confused with each
//! other in logs:
//!
//! - [`ProductId`]: `prod_01h455vb4pex5vsknk084sn02q`
//! - [`RequestId`]: `req_01h455vb4pex5vsknk084sn02q`

use http::Request;
use mti::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Error type for identifier parsing.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The ID could not be parsed as a valid TypeID.
    #[error("failed to parse identifier: {0}")]
    Parse(#[from] MagicTypeIdError),

    /// The prefix was not the expected value.
    #[error("invalid prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix {
        /// The expected prefix.
        expected: String,
        /// The actual prefix found.
        actual: String,
    },
}

fn parse_prefixed(s: &str, prefix: &str) -> Result<MagicTypeId, IdError> {
    let mti = MagicTypeId::from_str(s)?;

    if mti.prefix().as_str() != prefix {
        return Err(IdError::InvalidPrefix {
            expected: prefix.to_string(),
            actual: mti.prefix().as_str().to_string(),
        });
    }

    Ok(mti)
}

/// Identifier of a catalog product.
///
/// Assigned by storage on creation and exposed as `product_id` / `id` on the
/// wire. Format: `prod_<base32-encoded-uuidv7>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(MagicTypeId);

impl ProductId {
    /// The prefix used for product IDs
    pub const PREFIX: &'static str = "prod";

    /// Creates a new time-sortable product ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the product ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, Self::PREFIX).map(Self)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A type-safe request identifier for distributed tracing.
///
/// Format: `req_<base32-encoded-uuidv7>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, Self::PREFIX).map(Self)
    }
}

/// A `MakeRequestId` implementation that generates [`RequestId`]s for tower-http.
///
/// Used with `tower_http::request_id::SetRequestIdLayer` by the server so
/// every incoming request carries an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_new() {
        let id = ProductId::new();
        assert!(id.as_str().starts_with("prod_"));
        // prefix (4) + underscore (1) + suffix (26)
        assert_eq!(id.as_str().len(), 31);
    }

    #[test]
    fn test_product_id_parse() {
        let id_str = "prod_01h455vb4pex5vsknk084sn02q";
        let id = ProductId::from_str(id_str).unwrap();
        assert_eq!(id.as_str(), id_str);
        assert_eq!(id.to_string(), id_str);
    }

    #[test]
    fn test_product_id_rejects_request_prefix() {
        match ProductId::from_str("req_01h455vb4pex5vsknk084sn02q").unwrap_err() {
            IdError::InvalidPrefix { expected, actual } => {
                assert_eq!(expected, "prod");
                assert_eq!(actual, "req");
            }
            other => panic!("Expected InvalidPrefix error, got {other:?}"),
        }
    }

    #[test]
    fn test_product_id_rejects_garbage() {
        assert!(ProductId::from_str("prod_invalid").is_err());
        assert!(ProductId::from_str("not-an-id").is_err());
    }

    #[test]
    fn test_product_id_serializes_as_string() {
        let id = ProductId::from_str("prod_01h455vb4pex5vsknk084sn02q").unwrap();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!("prod_01h455vb4pex5vsknk084sn02q"));

        let back: ProductId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_product_ids_are_time_ordered() {
        let first = ProductId::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let second = ProductId::new();
        assert!(first < second);
    }

    #[test]
    fn test_make_typed_request_id() {
        let mut maker = MakeTypedRequestId;
        let request = http::Request::builder().body(()).unwrap();

        let header_value = maker.make_request_id(&request).unwrap().into_header_value();
        let id_str = header_value.to_str().unwrap();
        assert!(id_str.starts_with("req_"));
        assert!(RequestId::from_str(id_str).is_ok());
    }
}
