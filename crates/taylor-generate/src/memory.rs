//! In-memory collaborators: a generic record type, a constructor that
//! enforces bulk-assignment protection, and a store that validates records
//! before keeping them.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use taylor_core::{
    AttributeSet, CatalogDescription, DescribedCatalog, EntityConstructor, EntityType,
    Persistence, PersistenceError, RejectedAssignment, SchemaCatalog, Value,
};
use tracing::debug;
use uuid::Uuid;

use crate::checks::violations;

/// Generic instance of any entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity: EntityType,
    id: Option<Uuid>,
    attributes: AttributeSet<Record>,
}

impl Record {
    pub fn new(entity: impl Into<EntityType>) -> Self {
        Self {
            entity: entity.into(),
            id: None,
            attributes: AttributeSet::new(),
        }
    }

    pub fn entity(&self) -> &EntityType {
        &self.entity
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn attributes(&self) -> &AttributeSet<Record> {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Value<Record>> {
        self.attributes.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Associated record stored under `name`.
    pub fn related(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(Value::as_entity)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value<Record>>) {
        self.attributes.insert(name, value);
    }
}

/// Builds [`Record`]s, refusing bulk assignment of protected attributes.
#[derive(Debug, Clone, Default)]
pub struct RecordConstructor {
    protected: HashMap<EntityType, BTreeSet<String>>,
}

impl RecordConstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect every attribute the catalog marks as protected.
    pub fn from_catalog(catalog: &CatalogDescription) -> Self {
        let mut constructor = Self::new();
        for entity in &catalog.entities {
            for attribute in entity.protected_attributes() {
                constructor = constructor.protect(entity.name.clone(), attribute);
            }
        }
        constructor
    }

    pub fn protect(mut self, entity: impl Into<EntityType>, attribute: impl Into<String>) -> Self {
        self.protected
            .entry(entity.into())
            .or_default()
            .insert(attribute.into());
        self
    }

    fn is_protected(&self, entity: &EntityType, attribute: &str) -> bool {
        self.protected
            .get(entity)
            .is_some_and(|attributes| attributes.contains(attribute))
    }
}

impl EntityConstructor for RecordConstructor {
    type Instance = Record;

    fn construct_bulk(
        &self,
        entity: &EntityType,
        attributes: AttributeSet<Record>,
    ) -> Result<Record, RejectedAssignment> {
        if let Some(attribute) = attributes
            .keys()
            .find(|attribute| self.is_protected(entity, attribute))
        {
            return Err(RejectedAssignment::new(
                entity,
                attribute,
                "attribute is protected from bulk assignment",
            ));
        }
        Ok(Record {
            entity: entity.clone(),
            id: None,
            attributes,
        })
    }

    fn construct_empty(&self, entity: &EntityType) -> Record {
        Record::new(entity)
    }

    fn assign(&self, instance: &mut Record, attribute: &str, value: Value<Record>) {
        instance.attributes.insert(attribute, value);
    }
}

/// In-memory persistence. With a catalog attached, records failing their
/// rules are refused like an invalid save.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Option<DescribedCatalog>,
    records: Mutex<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validating(catalog: DescribedCatalog) -> Self {
        Self {
            catalog: Some(catalog),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: Uuid) -> Option<Record> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| record.id == Some(id))
            .cloned()
    }

    fn check(&self, record: &Record) -> Result<(), PersistenceError> {
        let Some(provider) = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.schema(&record.entity))
        else {
            return Ok(());
        };
        let failed = violations(provider, &record.attributes);
        if failed.is_empty() {
            return Ok(());
        }
        let detail = failed
            .iter()
            .map(|rule| format!("{} ({})", rule.attribute, rule.rule.name()))
            .collect::<Vec<_>>()
            .join(", ");
        Err(PersistenceError::new(
            record.entity.clone(),
            format!("validation failed: {detail}"),
        ))
    }
}

impl Persistence<Record> for MemoryStore {
    fn persist(&self, mut record: Record) -> Result<Record, PersistenceError> {
        self.check(&record)?;
        let id = *record.id.get_or_insert_with(Uuid::new_v4);
        debug!(entity = %record.entity, id = %id, "record stored");
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.retain(|stored| stored.id != Some(id));
        records.push(record.clone());
        Ok(record)
    }
}
