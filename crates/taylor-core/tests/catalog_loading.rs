use std::fs;
use std::path::Path;

use taylor_core::{
    DescribedCatalog, EntityType, Error, Length, Literal, Rule, SchemaCatalog, StorageKind,
    load_catalog,
};

fn fixture() -> serde_json::Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.catalog.json");
    let contents =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

#[test]
fn loads_rules_and_storage_kinds() {
    let catalog = load_catalog(&fixture()).expect("load catalog");
    let catalog = DescribedCatalog::from_description(catalog);
    let product = catalog
        .schema(&EntityType::from("product"))
        .expect("product schema");

    assert_eq!(product.storage_kind("invented_at"), Some(StorageKind::Datetime));
    assert_eq!(product.storage_kind("code"), None);
    assert_eq!(product.numeric_scale("price"), Some(2));
    assert_eq!(
        product.association_target("category"),
        Some(EntityType::from("category"))
    );

    let rules = product.validation_rules();
    let description = rules
        .iter()
        .find(|rule| rule.attribute == "description")
        .expect("description rule");
    assert_eq!(description.rule, Rule::Length(Length::within(4..=7)));

    let size = rules
        .iter()
        .find(|rule| rule.attribute == "size")
        .expect("size rule");
    assert_eq!(size.rule, Rule::inclusion_of(["s", "m", "l"]));

    let acceptance = rules
        .iter()
        .find(|rule| rule.attribute == "terms_accepted")
        .expect("acceptance rule");
    match &acceptance.rule {
        Rule::Acceptance(options) => {
            assert_eq!(options.accept, Literal::Bool(true));
            assert!(!options.allow_nil);
        }
        other => panic!("unexpected rule {other:?}"),
    }
}

#[test]
fn unknown_entities_expose_no_schema() {
    let catalog = DescribedCatalog::from_description(load_catalog(&fixture()).expect("load"));
    assert!(catalog.schema(&EntityType::from("value_object")).is_none());
}

#[test]
fn acceptance_defaults_follow_validator_defaults() {
    let rule: Rule = serde_json::from_value(serde_json::json!({ "kind": "acceptance" }))
        .expect("parse rule");
    match rule {
        Rule::Acceptance(options) => {
            assert_eq!(options.accept, Literal::Bool(true));
            assert!(options.allow_nil);
        }
        other => panic!("unexpected rule {other:?}"),
    }
}

#[test]
fn semantic_validation_runs_after_structural_checks() {
    let document = serde_json::json!({
        "entities": [
            {
                "name": "product",
                "rules": [
                    { "attribute": "name", "rule": { "kind": "length", "minimum": 9, "maximum": 2 } }
                ]
            }
        ]
    });

    let err = load_catalog(&document).expect_err("minimum above maximum");
    assert!(matches!(err, Error::InvalidCatalog(_)));
}
