//! Constraint-driven value synthesis for Taylor.
//!
//! This crate reads validation rules through the `taylor-core` collaborator
//! traits and builds entity instances whose attributes satisfy them, with
//! explicit overrides and registered specifications taking precedence.

pub mod checks;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod memory;
pub mod options;
pub mod policy;
pub mod randomizer;
pub mod registry;
pub mod resolver;
pub mod synthesizer;
pub mod taylor;

pub use checks::{CheckOutcome, evaluate_rule, violations};
pub use engine::EntityGenerator;
pub use errors::GenerationError;
pub use logging::{LogFormat, LogOptions, init_logging};
pub use memory::{MemoryStore, Record, RecordConstructor};
pub use options::{AssignmentMode, DEFAULT_MAX_ASSOCIATION_DEPTH, GenerateOptions};
pub use policy::AssignmentPolicy;
pub use registry::{Specification, SpecificationRegistry};
pub use resolver::{ResolvedAttribute, RuleSet, SemanticKind, resolve_attributes};
pub use synthesizer::{Synthesis, synthesize};
pub use taylor::Taylor;
