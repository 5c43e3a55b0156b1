use std::fs;
use std::path::Path;

use taylor_core::{
    AttributeSet, DescribedCatalog, EntityDescription, EntityType, Rule, SchemaCatalog,
    StorageKind, Value, load_catalog,
};
use taylor_generate::{
    AssignmentMode, GenerateOptions, GenerationError, MemoryStore, Record, RecordConstructor,
    Taylor, violations,
};

fn shop() -> (DescribedCatalog, RecordConstructor) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../taylor-core/tests/fixtures/shop.catalog.json");
    let contents =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    let json: serde_json::Value = serde_json::from_str(&contents).expect("parse json");
    let description = load_catalog(&json).expect("load catalog");
    let constructor = RecordConstructor::from_catalog(&description);
    (DescribedCatalog::from_description(description), constructor)
}

fn attributes() -> AttributeSet<Record> {
    AttributeSet::new()
}

#[test]
fn required_association_is_fully_constructed() {
    let (catalog, constructor) = shop();
    let taylor = Taylor::new(catalog, constructor);

    let product = taylor.generate("product", attributes()).expect("generate");
    let category = product.related("category").expect("category constructed");

    assert_eq!(category.entity(), &EntityType::from("category"));
    let title = category.text("title").expect("title synthesized");
    assert!(!title.is_empty());
}

#[test]
fn generated_products_pass_their_own_rules() {
    let (catalog, constructor) = shop();
    let taylor = Taylor::new(catalog, constructor);
    let product = EntityType::from("product");

    for _ in 0..20 {
        let record = taylor.generate(product.clone(), attributes()).expect("generate");
        let provider = taylor.catalog().schema(&product).expect("product schema");
        let failed = violations(provider, record.attributes());
        assert!(failed.is_empty(), "violated rules: {failed:?}");

        let price = record.get("price").and_then(Value::as_decimal).expect("price");
        assert!(price.scale() <= 2, "price {price} exceeds scale");
        assert_eq!(record.get("terms_accepted"), Some(&Value::Bool(true)));
    }
}

#[test]
fn bulk_mode_propagates_rejected_assignment() {
    let (catalog, constructor) = shop();
    let taylor = Taylor::new(catalog, constructor);

    let err = taylor
        .generate("product", attributes().with("owner_id", 1_i64))
        .expect_err("owner_id is protected");
    match err {
        GenerationError::RejectedAssignment(rejected) => {
            assert_eq!(rejected.entity, EntityType::from("product"));
            assert_eq!(rejected.attribute, "owner_id");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sequential_mode_bypasses_protection() {
    let (catalog, constructor) = shop();
    let taylor = Taylor::new(catalog, constructor);
    assert_eq!(taylor.assignment_mode(), AssignmentMode::Bulk);

    taylor.set_assignment_mode(AssignmentMode::Sequential);
    let record = taylor
        .generate("product", attributes().with("owner_id", 1_i64))
        .expect("generate");

    assert_eq!(record.get("owner_id"), Some(&Value::Int(1)));
    assert!(record.text("name").is_some());
}

#[test]
fn sequential_mode_from_options() {
    let (catalog, constructor) = shop();
    let options = GenerateOptions::from_toml_str("assignment = \"sequential\"\nseed = 3\n")
        .expect("parse options");
    let taylor = Taylor::with_options(catalog, constructor, options);

    assert_eq!(taylor.assignment_mode(), AssignmentMode::Sequential);
    taylor
        .generate("product", attributes().with("owner_id", 2_i64))
        .expect("generate");
}

#[test]
fn generate_and_persist_assigns_identity() {
    let (catalog, constructor) = shop();
    let store = MemoryStore::validating(catalog.clone());
    let taylor = Taylor::new(catalog, constructor);

    let record = taylor
        .generate_and_persist(&store, "product", attributes().with("name", "Jonas"))
        .expect("persist");

    let id = record.id().expect("persisted id");
    assert!(record.is_persisted());
    assert_eq!(store.len(), 1);
    assert_eq!(store.find(id).as_ref().and_then(|r| r.text("name")), Some("Jonas"));
}

#[test]
fn persistence_failure_surfaces_unmodified() {
    let (catalog, constructor) = shop();
    let store = MemoryStore::validating(catalog.clone());
    let taylor = Taylor::new(catalog, constructor);

    let err = taylor
        .generate_and_persist(&store, "product", attributes().with("amount", 9_i64))
        .expect_err("amount above bound");

    match err {
        GenerationError::Persistence(failure) => {
            assert_eq!(failure.entity, EntityType::from("product"));
            assert!(failure.message.contains("amount"), "{}", failure.message);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.is_empty());
}

#[test]
fn required_association_cycle_is_reported() {
    let catalog = DescribedCatalog::new()
        .with(
            EntityDescription::new("author")
                .belongs_to("book", "book")
                .rule("book", Rule::Presence),
        )
        .with(
            EntityDescription::new("book")
                .attribute("title", StorageKind::String)
                .belongs_to("author", "author")
                .rule("title", Rule::Presence)
                .rule("author", Rule::Presence),
        );
    let taylor = Taylor::new(catalog, RecordConstructor::new());

    let err = taylor.generate("author", attributes()).expect_err("cycle");
    match err {
        GenerationError::AssociationCycle { path } => {
            assert_eq!(path, "author -> book -> author");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn explicit_association_override_breaks_the_cycle() {
    let catalog = DescribedCatalog::new()
        .with(
            EntityDescription::new("author")
                .belongs_to("book", "book")
                .rule("book", Rule::Presence),
        )
        .with(
            EntityDescription::new("book")
                .belongs_to("author", "author")
                .rule("author", Rule::Presence),
        );
    let taylor = Taylor::new(catalog, RecordConstructor::new());

    let author = Record::new("author");
    let book = taylor
        .generate("book", attributes().with("author", Value::Entity(Box::new(author))))
        .expect("generate");
    assert_eq!(
        book.related("author").map(Record::entity),
        Some(&EntityType::from("author"))
    );
}

#[test]
fn association_depth_is_bounded() {
    let mut catalog = DescribedCatalog::new();
    for level in 0..5 {
        catalog.insert(
            EntityDescription::new(format!("level{level}"))
                .belongs_to("parent", format!("level{}", level + 1))
                .rule("parent", Rule::Presence),
        );
    }
    let options = GenerateOptions {
        max_association_depth: 3,
        ..GenerateOptions::default()
    };
    let taylor = Taylor::with_options(catalog, RecordConstructor::new(), options);

    let err = taylor.generate("level0", attributes()).expect_err("too deep");
    assert!(matches!(
        err,
        GenerationError::AssociationDepthExceeded { depth: 3, .. }
    ));
}
