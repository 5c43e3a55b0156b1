//! Core contracts for Taylor.
//!
//! This crate defines the rule model, attribute values, the collaborator
//! traits consumed by the generator, and the declarative catalog format.

pub mod error;
pub mod provider;
pub mod rules;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use error::{Error, PersistenceError, RejectedAssignment, Result};
pub use provider::{EntityConstructor, Persistence, SchemaCatalog, SchemaProvider};
pub use rules::{Acceptance, AttributeRule, Length, Literal, Numericality, Rule};
pub use schema::{
    AssociationDescriptor, AssociationKind, AttributeDescriptor, CatalogDescription,
    DescribedCatalog, EntityDescription, catalog_json_schema,
};
pub use types::{EntityType, StorageKind};
pub use validation::{
    ValidationIssue, ValidationReport, load_catalog, validate_catalog, validate_catalog_json,
};
pub use value::{AttributeSet, Value};

/// Current contract version for catalog documents.
pub const CATALOG_VERSION: &str = "0.1";
