use rand::RngCore;
use tracing::{debug, trace};

use taylor_core::{AttributeSet, EntityConstructor, EntityType, SchemaCatalog, Value};

use crate::errors::GenerationError;
use crate::options::{AssignmentMode, DEFAULT_MAX_ASSOCIATION_DEPTH};
use crate::policy::AssignmentPolicy;
use crate::registry::SpecificationRegistry;
use crate::resolver::resolve_attributes;
use crate::synthesizer::{Synthesis, synthesize};

/// Builds instances of entity types from explicit overrides, registered
/// specifications, and rule-driven synthesis, in that precedence.
pub struct EntityGenerator<'a, S: ?Sized, C: EntityConstructor> {
    catalog: &'a S,
    constructor: &'a C,
    registry: &'a SpecificationRegistry<C::Instance>,
    policy: &'a AssignmentPolicy,
    max_depth: usize,
}

impl<'a, S, C> EntityGenerator<'a, S, C>
where
    S: SchemaCatalog + ?Sized,
    C: EntityConstructor,
{
    pub fn new(
        catalog: &'a S,
        constructor: &'a C,
        registry: &'a SpecificationRegistry<C::Instance>,
        policy: &'a AssignmentPolicy,
    ) -> Self {
        Self {
            catalog,
            constructor,
            registry,
            policy,
            max_depth: DEFAULT_MAX_ASSOCIATION_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Generate and construct one instance.
    pub fn generate(
        &self,
        entity: &EntityType,
        overrides: AttributeSet<C::Instance>,
        rng: &mut dyn RngCore,
    ) -> Result<C::Instance, GenerationError> {
        let mut chain = Vec::new();
        self.generate_nested(entity, overrides, &mut chain, rng)
    }

    /// Assemble the final attribute set without constructing the instance.
    /// Required associations are still generated and constructed.
    pub fn attributes(
        &self,
        entity: &EntityType,
        overrides: AttributeSet<C::Instance>,
        rng: &mut dyn RngCore,
    ) -> Result<AttributeSet<C::Instance>, GenerationError> {
        let mut chain = Vec::new();
        self.assemble(entity, overrides, &mut chain, rng)
    }

    fn generate_nested(
        &self,
        entity: &EntityType,
        overrides: AttributeSet<C::Instance>,
        chain: &mut Vec<EntityType>,
        rng: &mut dyn RngCore,
    ) -> Result<C::Instance, GenerationError> {
        let attributes = self.assemble(entity, overrides, chain, rng)?;
        self.construct(entity, attributes)
    }

    fn assemble(
        &self,
        entity: &EntityType,
        overrides: AttributeSet<C::Instance>,
        chain: &mut Vec<EntityType>,
        rng: &mut dyn RngCore,
    ) -> Result<AttributeSet<C::Instance>, GenerationError> {
        if chain.contains(entity) {
            let path = chain
                .iter()
                .chain(std::iter::once(entity))
                .map(EntityType::as_str)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(GenerationError::AssociationCycle { path });
        }
        if chain.len() >= self.max_depth {
            return Err(GenerationError::AssociationDepthExceeded {
                entity: entity.clone(),
                depth: self.max_depth,
            });
        }

        debug!(entity = %entity, overrides = overrides.len(), depth = chain.len(), "generating entity");
        let mut attributes = overrides;

        if let Some(specification) = self.registry.specification(entity) {
            let mut applied = 0_usize;
            for (name, value) in specification() {
                if attributes.insert_if_absent(name, value) {
                    applied += 1;
                }
            }
            trace!(entity = %entity, applied, "specification applied");
        }

        if self.registry.inference_disabled(entity) {
            trace!(entity = %entity, "inference disabled, skipping synthesis");
            return Ok(attributes);
        }

        chain.push(entity.clone());
        for attribute in resolve_attributes(self.catalog, entity) {
            if attributes.contains(&attribute.name) {
                trace!(entity = %entity, attribute = %attribute.name, "value already supplied");
                continue;
            }
            match synthesize(&attribute, rng) {
                Synthesis::Value(value) => {
                    trace!(entity = %entity, attribute = %attribute.name, kind = value.kind_name(), "synthesized");
                    attributes.insert_if_absent(attribute.name, value);
                }
                Synthesis::Associate(target) => {
                    trace!(entity = %entity, attribute = %attribute.name, target = %target, "generating association");
                    let associated =
                        self.generate_nested(&target, AttributeSet::new(), chain, rng)?;
                    attributes.insert_if_absent(attribute.name, Value::Entity(Box::new(associated)));
                }
                Synthesis::NoOpinion => {
                    trace!(entity = %entity, attribute = %attribute.name, "no opinion");
                }
            }
        }
        chain.pop();

        Ok(attributes)
    }

    fn construct(
        &self,
        entity: &EntityType,
        attributes: AttributeSet<C::Instance>,
    ) -> Result<C::Instance, GenerationError> {
        let mode = self.policy.mode();
        debug!(entity = %entity, attributes = attributes.len(), mode = ?mode, "constructing entity");
        match mode {
            AssignmentMode::Bulk => Ok(self.constructor.construct_bulk(entity, attributes)?),
            AssignmentMode::Sequential => {
                let mut instance = self.constructor.construct_empty(entity);
                for (name, value) in attributes {
                    self.constructor.assign(&mut instance, &name, value);
                }
                Ok(instance)
            }
        }
    }
}
