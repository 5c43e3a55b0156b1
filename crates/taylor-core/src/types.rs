use std::fmt;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, Metadata, Schema, SchemaObject};
use serde::{Deserialize, Serialize};

/// Opaque handle naming a kind of record the engine can generate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityType {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&EntityType> for EntityType {
    fn from(value: &EntityType) -> Self {
        value.clone()
    }
}

/// Declared storage kind of an attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    Time,
    #[serde(alias = "timestamp")]
    Datetime,
    Association,
    /// No backing storage; the attribute only exists because a rule names it.
    Virtual,
    Unknown,
}

impl StorageKind {
    pub const ALL: [StorageKind; 12] = [
        StorageKind::String,
        StorageKind::Text,
        StorageKind::Integer,
        StorageKind::Float,
        StorageKind::Decimal,
        StorageKind::Boolean,
        StorageKind::Date,
        StorageKind::Time,
        StorageKind::Datetime,
        StorageKind::Association,
        StorageKind::Virtual,
        StorageKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::String => "string",
            StorageKind::Text => "text",
            StorageKind::Integer => "integer",
            StorageKind::Float => "float",
            StorageKind::Decimal => "decimal",
            StorageKind::Boolean => "boolean",
            StorageKind::Date => "date",
            StorageKind::Time => "time",
            StorageKind::Datetime => "datetime",
            StorageKind::Association => "association",
            StorageKind::Virtual => "virtual",
            StorageKind::Unknown => "unknown",
        }
    }
}

/// Accepted spellings in catalog documents: every canonical name plus the
/// `timestamp` alias of `datetime`.
impl JsonSchema for StorageKind {
    fn schema_name() -> String {
        "StorageKind".to_string()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        let names = StorageKind::ALL
            .iter()
            .map(StorageKind::as_str)
            .chain(std::iter::once("timestamp"))
            .map(serde_json::Value::from)
            .collect();
        SchemaObject {
            metadata: Some(Box::new(Metadata {
                description: Some("Declared storage kind of an attribute.".to_string()),
                ..Metadata::default()
            })),
            instance_type: Some(InstanceType::String.into()),
            enum_values: Some(names),
            ..SchemaObject::default()
        }
        .into()
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_alias_is_part_of_the_json_schema() {
        let schema = serde_json::to_value(schemars::schema_for!(StorageKind)).expect("schema");
        let names = schema["enum"].as_array().expect("enum values");
        assert!(names.contains(&serde_json::json!("timestamp")));
        assert!(names.contains(&serde_json::json!("datetime")));
        assert_eq!(names.len(), StorageKind::ALL.len() + 1);

        let kind: StorageKind = serde_json::from_str("\"timestamp\"").expect("alias");
        assert_eq!(kind, StorageKind::Datetime);
    }
}
