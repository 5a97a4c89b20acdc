//! Repository error types
//!
//! Storage failures carry the operation that was running and a coarse kind,
//! so the HTTP layer can log them with context without knowing the backend.

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Finding a single entity by ID
    FindById,
    /// Finding multiple entities with filters
    FindAll,
    /// Counting entities matching filters
    Count,
    /// Creating a new entity
    Create,
    /// Updating an existing entity
    Update,
    /// Deleting an entity
    Delete,
    /// Listing distinct categories
    Categories,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::Count => write!(f, "count"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Categories => write!(f, "categories"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// The identifier is not well-formed for this entity type
    InvalidIdentifier,
    /// Field validation failed before the write
    ValidationFailed,
    /// The backing store could not serve the request
    Unavailable,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier => write!(f, "invalid_identifier"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g., "Product")
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create an "invalid identifier" error for a raw id that failed to parse
    ///
    /// ```rust
    /// use catalog_service::repository::{
    ///     RepositoryError, RepositoryErrorKind, RepositoryOperation,
    /// };
    ///
    /// let error =
    ///     RepositoryError::invalid_identifier(RepositoryOperation::Delete, "Product", "42");
    /// assert_eq!(error.kind, RepositoryErrorKind::InvalidIdentifier);
    /// assert_eq!(error.entity_id.as_deref(), Some("42"));
    /// ```
    pub fn invalid_identifier(
        operation: RepositoryOperation,
        entity_type: impl Into<String>,
        raw_id: impl Into<String>,
    ) -> Self {
        let entity_type = entity_type.into();
        Self::new(
            operation,
            RepositoryErrorKind::InvalidIdentifier,
            format!("Malformed {} identifier", entity_type),
        )
        .with_entity(entity_type, raw_id)
    }

    /// Create a validation failed error listing the violated fields
    pub fn validation_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ValidationFailed, message)
    }

    /// Create an error for a store that could not serve the request
    pub fn unavailable(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Unavailable, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_operation_display() {
        assert_eq!(RepositoryOperation::FindById.to_string(), "find_by_id");
        assert_eq!(RepositoryOperation::FindAll.to_string(), "find_all");
        assert_eq!(RepositoryOperation::Categories.to_string(), "categories");
    }

    #[test]
    fn test_invalid_identifier_carries_entity() {
        let error =
            RepositoryError::invalid_identifier(RepositoryOperation::FindById, "Product", "abc");
        assert_eq!(error.kind, RepositoryErrorKind::InvalidIdentifier);
        assert_eq!(error.message, "Malformed Product identifier");
        assert_eq!(error.entity_type.as_deref(), Some("Product"));
        assert_eq!(error.entity_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_validation_failed_keeps_operation() {
        let error =
            RepositoryError::validation_failed(RepositoryOperation::Update, "price: must be >= 0");
        assert_eq!(error.operation, RepositoryOperation::Update);
        assert_eq!(error.kind, RepositoryErrorKind::ValidationFailed);
    }

    #[test]
    fn test_display_without_entity() {
        let error = RepositoryError::unavailable(RepositoryOperation::Create, "store closed");
        assert_eq!(
            error.to_string(),
            "Repository unavailable error during create: store closed"
        );
    }

    #[test]
    fn test_display_with_entity() {
        let error =
            RepositoryError::invalid_identifier(RepositoryOperation::Delete, "Product", "xyz");
        let display = error.to_string();
        assert!(display.contains("invalid_identifier"));
        assert!(display.contains("delete"));
        assert!(display.ends_with("[Product: xyz]"));
    }

    #[test]
    fn test_error_is_error_trait() {
        let error: Box<dyn std::error::Error> = Box::new(RepositoryError::unavailable(
            RepositoryOperation::Count,
            "down",
        ));
        assert!(error.to_string().contains("unavailable"));
    }
}
