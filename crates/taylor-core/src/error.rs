use thiserror::Error;

use crate::types::EntityType;
use crate::validation::ValidationReport;

/// Core error type for catalog loading and validation.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog violates internal invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    /// The catalog document failed JSON Schema validation.
    #[error("catalog does not match its json schema ({} issues)", .0.errors.len())]
    SchemaViolation(ValidationReport),
    /// The JSON Schema itself could not be compiled.
    #[error("schema error: {0}")]
    Schema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by taylor crates.
pub type Result<T> = std::result::Result<T, Error>;

/// An entity constructor refused to bulk-assign an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} refused bulk assignment of '{attribute}': {reason}")]
pub struct RejectedAssignment {
    pub entity: EntityType,
    pub attribute: String,
    pub reason: String,
}

impl RejectedAssignment {
    pub fn new(
        entity: impl Into<EntityType>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

/// A persistence collaborator failed to store an instance.
#[derive(Debug, Error)]
#[error("failed to persist {entity}: {message}")]
pub struct PersistenceError {
    pub entity: EntityType,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PersistenceError {
    pub fn new(entity: impl Into<EntityType>, message: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}
