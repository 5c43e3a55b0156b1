use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use taylor_core::{AttributeSet, EntityType};
use tracing::debug;

/// Zero-argument generator of default attributes for one entity type.
pub type Specification<E> = Arc<dyn Fn() -> AttributeSet<E> + Send + Sync>;

struct RegistryEntry<E> {
    specification: Option<Specification<E>>,
    inference_disabled: bool,
}

impl<E> Default for RegistryEntry<E> {
    fn default() -> Self {
        Self {
            specification: None,
            inference_disabled: false,
        }
    }
}

/// Per-entity-type specifications and inference-disabled flags.
///
/// Entries live as long as the registry; there is no removal. A later
/// registration for the same entity type replaces the specification.
pub struct SpecificationRegistry<E> {
    entries: RwLock<HashMap<EntityType, RegistryEntry<E>>>,
}

impl<E> Default for SpecificationRegistry<E> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<E> fmt::Debug for SpecificationRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_map();
        for (entity, entry) in entries.iter() {
            map.entry(
                &entity.as_str(),
                &format_args!(
                    "specification={}, inference_disabled={}",
                    entry.specification.is_some(),
                    entry.inference_disabled
                ),
            );
        }
        map.finish()
    }
}

impl<E> SpecificationRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register default attributes for an entity type; inference stays on.
    pub fn register<F>(&self, entity: impl Into<EntityType>, specification: F)
    where
        F: Fn() -> AttributeSet<E> + Send + Sync + 'static,
    {
        let entity = entity.into();
        debug!(entity = %entity, "specification registered");
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.entry(entity).or_default().specification = Some(Arc::new(specification));
    }

    /// Register default attributes and disable inference for the entity type.
    /// The flag is permanent for the life of the registry.
    pub fn register_exclusive<F>(&self, entity: impl Into<EntityType>, specification: F)
    where
        F: Fn() -> AttributeSet<E> + Send + Sync + 'static,
    {
        let entity = entity.into();
        debug!(entity = %entity, "exclusive specification registered");
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(entity).or_default();
        entry.specification = Some(Arc::new(specification));
        entry.inference_disabled = true;
    }

    /// Registered specification, detached from the lock so it may re-enter the registry.
    pub fn specification(&self, entity: &EntityType) -> Option<Specification<E>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(entity)
            .and_then(|entry| entry.specification.clone())
    }

    pub fn inference_disabled(&self, entity: &EntityType) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(entity)
            .is_some_and(|entry| entry.inference_disabled)
    }
}
