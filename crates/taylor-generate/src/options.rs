use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::logging::LogOptions;

pub const DEFAULT_MAX_ASSOCIATION_DEPTH: usize = 32;

/// How a finished attribute set is applied to a new instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    /// Construct in one call with the whole set.
    #[default]
    Bulk,
    /// Construct empty, then assign attribute by attribute.
    /// Bypasses bulk-assignment protection, so it must be opted into.
    Sequential,
}

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Initial assignment mode of the shared policy.
    pub assignment: AssignmentMode,
    /// Maximum nesting of required associations.
    pub max_association_depth: usize,
    /// Seed for the shared random source. Unset draws a fresh seed.
    pub seed: Option<u64>,
    pub logging: LogOptions,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            assignment: AssignmentMode::Bulk,
            max_association_depth: DEFAULT_MAX_ASSOCIATION_DEPTH,
            seed: None,
            logging: LogOptions::default(),
        }
    }
}

impl GenerateOptions {
    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, GenerationError> {
        let options: GenerateOptions = toml::from_str(contents)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.max_association_depth == 0 {
            return Err(GenerationError::InvalidOptions(
                "max_association_depth must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;

    #[test]
    fn partial_toml_keeps_defaults() {
        let options = GenerateOptions::from_toml_str(
            r#"
assignment = "sequential"

[logging]
format = "json"
"#,
        )
        .expect("parse options");

        assert_eq!(options.assignment, AssignmentMode::Sequential);
        assert_eq!(options.max_association_depth, DEFAULT_MAX_ASSOCIATION_DEPTH);
        assert_eq!(options.seed, None);
        assert_eq!(options.logging.format, LogFormat::Json);
        assert_eq!(options.logging.filter, "info");
    }

    #[test]
    fn rejects_zero_depth() {
        let err = GenerateOptions::from_toml_str("max_association_depth = 0")
            .expect_err("depth must be positive");
        assert!(matches!(err, GenerationError::InvalidOptions(_)));
    }
}
