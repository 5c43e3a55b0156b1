//! Contracts with the collaborators the engine does not own: schema
//! introspection, instance construction, and persistence.

use crate::error::{PersistenceError, RejectedAssignment};
use crate::rules::AttributeRule;
use crate::types::{EntityType, StorageKind};
use crate::value::{AttributeSet, Value};

/// Rule and storage introspection for a single entity type.
pub trait SchemaProvider {
    /// Every rule declared on the entity type, in declaration order.
    fn validation_rules(&self) -> Vec<AttributeRule>;

    /// Declared storage kind of an attribute, if it has backing storage.
    fn storage_kind(&self, attribute: &str) -> Option<StorageKind>;

    /// Target entity type when the attribute is a has-one/belongs-to relation.
    fn association_target(&self, attribute: &str) -> Option<EntityType>;

    /// Fixed-point scale of a decimal attribute.
    fn numeric_scale(&self, _attribute: &str) -> Option<u32> {
        None
    }
}

/// Lookup of schema capabilities by entity type.
///
/// `None` means the entity type exposes no introspection at all, which is a
/// valid state (plain value objects), not an error.
pub trait SchemaCatalog {
    fn schema(&self, entity: &EntityType) -> Option<&dyn SchemaProvider>;
}

impl<T: SchemaCatalog + ?Sized> SchemaCatalog for &T {
    fn schema(&self, entity: &EntityType) -> Option<&dyn SchemaProvider> {
        (**self).schema(entity)
    }
}

/// Builds instances from finished attribute sets.
pub trait EntityConstructor {
    type Instance;

    /// Construct in one call. May refuse keys that must not be bulk-assigned.
    fn construct_bulk(
        &self,
        entity: &EntityType,
        attributes: AttributeSet<Self::Instance>,
    ) -> Result<Self::Instance, RejectedAssignment>;

    /// Construct an instance with no attributes set.
    fn construct_empty(&self, entity: &EntityType) -> Self::Instance;

    /// Assign a single attribute, bypassing bulk-assignment protection.
    fn assign(&self, instance: &mut Self::Instance, attribute: &str, value: Value<Self::Instance>);
}

/// Makes a constructed instance durable.
pub trait Persistence<I> {
    fn persist(&self, instance: I) -> Result<I, PersistenceError>;
}
