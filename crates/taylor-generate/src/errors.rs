use thiserror::Error;

use taylor_core::{EntityType, PersistenceError, RejectedAssignment};

/// Errors emitted by the generation engine.
///
/// Collaborator failures are forwarded transparently so callers see the
/// originating diagnostic.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    RejectedAssignment(#[from] RejectedAssignment),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("required association cycle: {path}")]
    AssociationCycle { path: String },
    #[error("association depth {depth} exceeded while generating {entity}")]
    AssociationDepthExceeded { entity: EntityType, depth: usize },
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
}
