use std::sync::{Mutex, PoisonError};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use taylor_core::{AttributeSet, EntityConstructor, EntityType, Persistence, SchemaCatalog};

use crate::engine::EntityGenerator;
use crate::errors::GenerationError;
use crate::options::{AssignmentMode, GenerateOptions};
use crate::policy::AssignmentPolicy;
use crate::registry::SpecificationRegistry;

/// Entry point owning the collaborators, the specification registry, the
/// assignment policy, and the shared random source.
///
/// Meant to be created once and shared; every method takes `&self`.
pub struct Taylor<S, C: EntityConstructor> {
    catalog: S,
    constructor: C,
    registry: SpecificationRegistry<C::Instance>,
    policy: AssignmentPolicy,
    options: GenerateOptions,
    rng: Mutex<ChaCha8Rng>,
}

impl<S, C> Taylor<S, C>
where
    S: SchemaCatalog,
    C: EntityConstructor,
{
    pub fn new(catalog: S, constructor: C) -> Self {
        Self::with_options(catalog, constructor, GenerateOptions::default())
    }

    pub fn with_options(catalog: S, constructor: C, options: GenerateOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        Self {
            catalog,
            constructor,
            registry: SpecificationRegistry::new(),
            policy: AssignmentPolicy::new(options.assignment),
            options,
            rng: Mutex::new(rng),
        }
    }

    /// Generate an instance of `entity`. Explicit overrides always win.
    pub fn generate(
        &self,
        entity: impl Into<EntityType>,
        overrides: AttributeSet<C::Instance>,
    ) -> Result<C::Instance, GenerationError> {
        let entity = entity.into();
        let mut rng = self.call_rng();
        self.generator().generate(&entity, overrides, &mut rng)
    }

    /// Generate an instance and hand it to `store`. Persistence failures
    /// surface unmodified.
    pub fn generate_and_persist<P>(
        &self,
        store: &P,
        entity: impl Into<EntityType>,
        overrides: AttributeSet<C::Instance>,
    ) -> Result<C::Instance, GenerationError>
    where
        P: Persistence<C::Instance> + ?Sized,
    {
        let entity = entity.into();
        let instance = self.generate(entity.clone(), overrides)?;
        debug!(entity = %entity, "persisting generated entity");
        Ok(store.persist(instance)?)
    }

    /// The attribute set `generate` would construct with.
    pub fn attributes_for(
        &self,
        entity: impl Into<EntityType>,
        overrides: AttributeSet<C::Instance>,
    ) -> Result<AttributeSet<C::Instance>, GenerationError> {
        let entity = entity.into();
        let mut rng = self.call_rng();
        self.generator().attributes(&entity, overrides, &mut rng)
    }

    pub fn register_specification<F>(&self, entity: impl Into<EntityType>, specification: F)
    where
        F: Fn() -> AttributeSet<C::Instance> + Send + Sync + 'static,
    {
        self.registry.register(entity, specification);
    }

    /// Register a specification and turn off synthesis for the entity type.
    pub fn register_exclusive_specification<F>(
        &self,
        entity: impl Into<EntityType>,
        specification: F,
    ) where
        F: Fn() -> AttributeSet<C::Instance> + Send + Sync + 'static,
    {
        self.registry.register_exclusive(entity, specification);
    }

    pub fn assignment_mode(&self) -> AssignmentMode {
        self.policy.mode()
    }

    pub fn set_assignment_mode(&self, mode: AssignmentMode) {
        self.policy.set_mode(mode);
    }

    pub fn registry(&self) -> &SpecificationRegistry<C::Instance> {
        &self.registry
    }

    pub fn catalog(&self) -> &S {
        &self.catalog
    }

    pub fn constructor(&self) -> &C {
        &self.constructor
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    fn generator(&self) -> EntityGenerator<'_, S, C> {
        EntityGenerator::new(&self.catalog, &self.constructor, &self.registry, &self.policy)
            .with_max_depth(self.options.max_association_depth)
    }

    /// Per-call generator split off the shared source, so specifications may
    /// call back into `generate` without holding the lock.
    fn call_rng(&self) -> ChaCha8Rng {
        let mut shared = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        ChaCha8Rng::seed_from_u64(shared.next_u64())
    }
}
