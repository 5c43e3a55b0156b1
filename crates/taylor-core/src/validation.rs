use std::collections::BTreeSet;

use jsonschema::JSONSchema;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::rules::{Length, Numericality, Rule};
use crate::schema::{CatalogDescription, catalog_json_schema};

/// Structural issue found while checking a catalog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub code: String,
    pub path: String,
    pub message: String,
}

/// Aggregated structural issues.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a catalog JSON document against the catalog JSON Schema.
pub fn validate_catalog_json(catalog_json: &Value, catalog_schema: &Value) -> Result<ValidationReport> {
    let compiled =
        JSONSchema::compile(catalog_schema).map_err(|err| Error::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(catalog_json) {
        for error in errors {
            let path = error.instance_path.to_string();
            report.errors.push(ValidationIssue {
                code: "schema_violation".to_string(),
                path: if path.is_empty() { "/".to_string() } else { path },
                message: error.to_string(),
            });
        }
    }

    Ok(report)
}

/// Validate internal consistency of a catalog.
///
/// This checks:
/// - duplicate entities, attributes, and associations
/// - association targets exist in the catalog
/// - rule parameters describe a non-empty set of values
pub fn validate_catalog(catalog: &CatalogDescription) -> Result<()> {
    let mut names = BTreeSet::new();
    for entity in &catalog.entities {
        if !names.insert(entity.name.clone()) {
            return Err(Error::InvalidCatalog(format!(
                "duplicate entity name: {}",
                entity.name
            )));
        }
    }

    for entity in &catalog.entities {
        let mut fields = BTreeSet::new();
        for attribute in &entity.attributes {
            if !fields.insert(attribute.name.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate attribute name: {}.{}",
                    entity.name, attribute.name
                )));
            }
        }

        for association in &entity.associations {
            if !fields.insert(association.name.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate association name: {}.{}",
                    entity.name, association.name
                )));
            }
            if !names.contains(&association.target) {
                return Err(Error::InvalidCatalog(format!(
                    "association target not found: {}.{} -> {}",
                    entity.name, association.name, association.target
                )));
            }
        }

        for rule in &entity.rules {
            validate_rule(&rule.rule).map_err(|msg| {
                Error::InvalidCatalog(format!(
                    "{} rule on {}.{}: {msg}",
                    rule.rule.name(),
                    entity.name,
                    rule.attribute
                ))
            })?;
        }
    }

    Ok(())
}

/// Validate a catalog document end-to-end and return the parsed catalog.
pub fn load_catalog(catalog_json: &Value) -> Result<CatalogDescription> {
    let schema = serde_json::to_value(catalog_json_schema())?;
    let report = validate_catalog_json(catalog_json, &schema)?;
    if !report.is_ok() {
        return Err(Error::SchemaViolation(report));
    }

    let catalog: CatalogDescription = serde_json::from_value(catalog_json.clone())?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_rule(rule: &Rule) -> std::result::Result<(), String> {
    match rule {
        Rule::Presence | Rule::Acceptance(_) => Ok(()),
        Rule::Format { pattern } => Regex::new(pattern)
            .map(|_| ())
            .map_err(|err| format!("invalid pattern: {err}")),
        Rule::InclusionOf { candidates } => {
            if candidates.is_empty() {
                Err("candidates must not be empty".to_string())
            } else {
                Ok(())
            }
        }
        Rule::Length(length) => validate_length(length),
        Rule::Numericality(numericality) => validate_numericality(numericality),
    }
}

fn validate_length(length: &Length) -> std::result::Result<(), String> {
    if let (Some(minimum), Some(maximum)) = (length.minimum, length.maximum)
        && minimum > maximum
    {
        return Err("minimum must be <= maximum".to_string());
    }
    Ok(())
}

fn validate_numericality(numericality: &Numericality) -> std::result::Result<(), String> {
    let bounds = [
        numericality.less_than,
        numericality.less_than_or_equal,
        numericality.greater_than,
        numericality.greater_than_or_equal,
    ];
    if let Some(bound) = bounds.into_iter().flatten().find(|bound| !bound.is_finite()) {
        return Err(format!("bound {bound} is not a finite number"));
    }

    let upper = [numericality.less_than, numericality.less_than_or_equal];
    let lower = [numericality.greater_than, numericality.greater_than_or_equal];
    for (i, upper) in upper.iter().enumerate() {
        for (j, lower) in lower.iter().enumerate() {
            let (Some(upper), Some(lower)) = (upper, lower) else {
                continue;
            };
            // Only the inclusive pair may meet at a single point.
            let empty = if i == 1 && j == 1 {
                lower > upper
            } else {
                lower >= upper
            };
            if empty {
                return Err(format!("bounds {lower} and {upper} leave no valid value"));
            }
        }
    }
    Ok(())
}
