use std::collections::HashMap;

use schemars::JsonSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::provider::{SchemaCatalog, SchemaProvider};
use crate::rules::{AttributeRule, Rule};
use crate::types::{EntityType, StorageKind};

/// Top-level declarative description of a set of entity types.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogDescription {
    /// Contract version for this catalog format.
    #[serde(default = "default_catalog_version")]
    pub catalog_version: String,
    pub entities: Vec<EntityDescription>,
}

impl Default for CatalogDescription {
    fn default() -> Self {
        Self {
            catalog_version: default_catalog_version(),
            entities: Vec::new(),
        }
    }
}

fn default_catalog_version() -> String {
    crate::CATALOG_VERSION.to_string()
}

/// Storage schema and validation rules of one entity type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntityDescription {
    pub name: EntityType,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
    #[serde(default)]
    pub associations: Vec<AssociationDescriptor>,
    #[serde(default)]
    pub rules: Vec<AttributeRule>,
}

/// Stored attribute of an entity type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AttributeDescriptor {
    pub name: String,
    pub kind: StorageKind,
    /// Digits after the decimal point for `decimal` attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Protected attributes cannot be bulk-assigned.
    #[serde(default)]
    pub protected: bool,
}

/// Kind of single-valued relation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    BelongsTo,
    HasOne,
}

/// Relation from an attribute to another entity type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AssociationDescriptor {
    pub name: String,
    pub target: EntityType,
    pub kind: AssociationKind,
}

impl EntityDescription {
    pub fn new(name: impl Into<EntityType>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            associations: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn attribute(mut self, name: impl Into<String>, kind: StorageKind) -> Self {
        self.attributes.push(AttributeDescriptor {
            name: name.into(),
            kind,
            scale: None,
            protected: false,
        });
        self
    }

    pub fn decimal(mut self, name: impl Into<String>, scale: u32) -> Self {
        self.attributes.push(AttributeDescriptor {
            name: name.into(),
            kind: StorageKind::Decimal,
            scale: Some(scale),
            protected: false,
        });
        self
    }

    pub fn protected(mut self, name: impl Into<String>, kind: StorageKind) -> Self {
        self.attributes.push(AttributeDescriptor {
            name: name.into(),
            kind,
            scale: None,
            protected: true,
        });
        self
    }

    pub fn belongs_to(mut self, name: impl Into<String>, target: impl Into<EntityType>) -> Self {
        self.associations.push(AssociationDescriptor {
            name: name.into(),
            target: target.into(),
            kind: AssociationKind::BelongsTo,
        });
        self
    }

    pub fn has_one(mut self, name: impl Into<String>, target: impl Into<EntityType>) -> Self {
        self.associations.push(AssociationDescriptor {
            name: name.into(),
            target: target.into(),
            kind: AssociationKind::HasOne,
        });
        self
    }

    pub fn rule(mut self, attribute: impl Into<String>, rule: Rule) -> Self {
        self.rules.push(AttributeRule::new(attribute, rule));
        self
    }

    pub fn descriptor(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    pub fn protected_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.protected)
            .map(|attribute| attribute.name.as_str())
    }
}

impl SchemaProvider for EntityDescription {
    fn validation_rules(&self) -> Vec<AttributeRule> {
        self.rules.clone()
    }

    fn storage_kind(&self, attribute: &str) -> Option<StorageKind> {
        self.descriptor(attribute).map(|descriptor| descriptor.kind)
    }

    fn association_target(&self, attribute: &str) -> Option<EntityType> {
        self.associations
            .iter()
            .find(|association| association.name == attribute)
            .map(|association| association.target.clone())
    }

    fn numeric_scale(&self, attribute: &str) -> Option<u32> {
        self.descriptor(attribute).and_then(|descriptor| descriptor.scale)
    }
}

/// Catalog indexed by entity type, serving schema lookups.
#[derive(Debug, Clone, Default)]
pub struct DescribedCatalog {
    entities: HashMap<EntityType, EntityDescription>,
}

impl DescribedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: CatalogDescription) -> Self {
        let mut catalog = Self::new();
        for entity in description.entities {
            catalog.insert(entity);
        }
        catalog
    }

    /// Add or redefine an entity type.
    pub fn insert(&mut self, entity: EntityDescription) -> Option<EntityDescription> {
        self.entities.insert(entity.name.clone(), entity)
    }

    pub fn with(mut self, entity: EntityDescription) -> Self {
        self.insert(entity);
        self
    }

    pub fn entity(&self, name: &EntityType) -> Option<&EntityDescription> {
        self.entities.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDescription> {
        self.entities.values()
    }
}

impl SchemaCatalog for DescribedCatalog {
    fn schema(&self, entity: &EntityType) -> Option<&dyn SchemaProvider> {
        self.entities
            .get(entity)
            .map(|description| description as &dyn SchemaProvider)
    }
}

/// Emit the JSON Schema for catalog documents.
pub fn catalog_json_schema() -> RootSchema {
    schema_for!(CatalogDescription)
}
