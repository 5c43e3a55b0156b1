use std::fs;
use std::path::Path;

use taylor_core::{Error, StorageKind, catalog_json_schema, load_catalog, validate_catalog_json};

fn load_json(path: &Path) -> serde_json::Value {
    let contents =
        fs::read_to_string(path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

fn fixture() -> serde_json::Value {
    load_json(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.catalog.json"))
}

#[test]
fn fixture_matches_generated_json_schema() {
    let schema = serde_json::to_value(catalog_json_schema()).expect("serialize schema");
    let report = validate_catalog_json(&fixture(), &schema).expect("compile schema");
    assert!(report.is_ok(), "structural errors: {:?}", report.errors);
}

#[test]
fn timestamp_alias_passes_structural_check() {
    let document = serde_json::json!({
        "entities": [
            { "name": "product", "attributes": [{ "name": "invented_at", "kind": "timestamp" }] }
        ]
    });

    let catalog = load_catalog(&document).expect("timestamp is an accepted kind");
    assert_eq!(
        catalog.entities[0].attributes[0].kind,
        StorageKind::Datetime
    );
}

#[test]
fn structural_errors_carry_instance_paths() {
    let schema = serde_json::to_value(catalog_json_schema()).expect("serialize schema");
    let document = serde_json::json!({
        "entities": [
            { "name": "product", "attributes": [{ "name": "name", "kind": "blob" }] }
        ]
    });

    let report = validate_catalog_json(&document, &schema).expect("compile schema");
    assert!(!report.is_ok());
    assert!(
        report
            .errors
            .iter()
            .any(|issue| issue.path.starts_with("/entities/0/attributes/0")),
        "unexpected paths: {:?}",
        report.errors
    );
}

#[test]
fn load_catalog_rejects_structural_violations() {
    let document = serde_json::json!({ "entities": "product" });
    let err = load_catalog(&document).expect_err("entities must be an array");
    assert!(matches!(err, Error::SchemaViolation(_)));
}
