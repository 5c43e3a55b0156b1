use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use taylor_core::{
    AttributeSet, DescribedCatalog, EntityDescription, Length, Numericality, Rule, StorageKind,
    Value,
};
use taylor_generate::{GenerateOptions, Record, RecordConstructor, Taylor};

const TRIALS: usize = 200;

fn taylor(entity: EntityDescription) -> Taylor<DescribedCatalog, RecordConstructor> {
    Taylor::new(DescribedCatalog::new().with(entity), RecordConstructor::new())
}

fn product() -> EntityDescription {
    EntityDescription::new("product")
        .attribute("name", StorageKind::String)
        .attribute("amount", StorageKind::Integer)
}

fn attributes() -> AttributeSet<Record> {
    AttributeSet::new()
}

#[test]
fn entity_without_rules_only_carries_explicit_keys() {
    let taylor = taylor(product());

    let empty = taylor.generate("product", attributes()).expect("generate");
    assert!(empty.attributes().is_empty());

    let record = taylor
        .generate("product", attributes().with("amount", 3_i64))
        .expect("generate");
    assert_eq!(record.attributes().keys().collect::<Vec<_>>(), vec!["amount"]);
}

#[test]
fn entity_without_schema_is_not_an_error() {
    let taylor = taylor(product());

    let record = taylor
        .generate("plain_value", attributes().with("label", "x"))
        .expect("generate");
    assert_eq!(record.text("label"), Some("x"));
    assert_eq!(record.attributes().len(), 1);
}

#[test]
fn exact_length_holds_for_every_trial() {
    let taylor = taylor(product().rule("name", Rule::Length(Length::exactly(4))));

    for _ in 0..TRIALS {
        let record = taylor.generate("product", attributes()).expect("generate");
        let name = record.text("name").expect("name synthesized");
        assert_eq!(name.chars().count(), 4, "unexpected name {name:?}");
    }
}

#[test]
fn strict_upper_bound_is_never_reached() {
    let taylor = taylor(product().rule("amount", Rule::Numericality(Numericality::less_than(8.0))));

    for _ in 0..TRIALS {
        let record = taylor.generate("product", attributes()).expect("generate");
        let amount = record.get("amount").and_then(Value::as_i64).expect("amount");
        assert!((0..8).contains(&amount), "amount {amount} out of range");
    }
}

#[test]
fn inclusive_upper_bound_stays_in_range() {
    let taylor = taylor(
        product().rule("amount", Rule::Numericality(Numericality::less_than_or_equal(8.0))),
    );

    for _ in 0..TRIALS {
        let record = taylor.generate("product", attributes()).expect("generate");
        let amount = record.get("amount").and_then(Value::as_i64).expect("amount");
        assert!((0..=8).contains(&amount), "amount {amount} out of range");
    }
}

#[test]
fn presence_yields_short_lowercase_name() {
    let taylor = taylor(product().rule("name", Rule::Presence));

    for _ in 0..TRIALS {
        let record = taylor.generate("product", attributes()).expect("generate");
        assert_eq!(record.attributes().len(), 1);
        let name = record.text("name").expect("name synthesized");
        assert!((4..=10).contains(&name.len()), "unexpected name {name:?}");
        assert!(name.chars().all(|c| c.is_ascii_lowercase()));
    }
}

#[test]
fn explicit_override_is_kept_verbatim() {
    let taylor = taylor(product().rule("name", Rule::Presence));

    let record = taylor
        .generate("product", attributes().with("name", "Jonas"))
        .expect("generate");
    assert_eq!(record.text("name"), Some("Jonas"));
}

#[test]
fn override_beats_specification_and_rules() {
    let taylor = taylor(
        product()
            .rule("name", Rule::Length(Length::exactly(4)))
            .rule("amount", Rule::Numericality(Numericality::less_than(8.0))),
    );
    taylor.register_specification("product", || {
        AttributeSet::new().with("name", "from-spec").with("amount", 5_i64)
    });

    let record = taylor
        .generate(
            "product",
            attributes().with("name", "overridden").with("amount", 999_i64),
        )
        .expect("generate");
    assert_eq!(record.text("name"), Some("overridden"));
    assert_eq!(record.get("amount"), Some(&Value::Int(999)));
}

#[test]
fn specification_values_beat_synthesis() {
    let taylor = taylor(product().rule("name", Rule::Length(Length::exactly(4))));
    taylor.register_specification("product", || AttributeSet::new().with("name", "from-spec"));

    let record = taylor.generate("product", attributes()).expect("generate");
    assert_eq!(record.text("name"), Some("from-spec"));
}

#[test]
fn specification_runs_once_per_generation_and_merges_identically() {
    let taylor = taylor(product().rule("name", Rule::Presence));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    taylor.register_specification("product", move || {
        let call = counter.fetch_add(1, Ordering::SeqCst) as i64;
        AttributeSet::new().with("amount", call)
    });

    let first = taylor.generate("product", attributes()).expect("generate");
    let second = taylor.generate("product", attributes()).expect("generate");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.get("amount"), Some(&Value::Int(0)));
    assert_eq!(second.get("amount"), Some(&Value::Int(1)));
    for record in [&first, &second] {
        assert_eq!(record.attributes().keys().collect::<Vec<_>>(), vec!["amount", "name"]);
    }
}

#[test]
fn exclusive_specification_disables_inference() {
    let taylor = taylor(
        product()
            .rule("name", Rule::Presence)
            .rule("amount", Rule::Presence),
    );
    taylor.register_exclusive_specification("product", || AttributeSet::new().with("amount", 1_i64));

    let record = taylor.generate("product", attributes()).expect("generate");
    assert_eq!(record.get("name"), None);
    assert_eq!(record.get("amount"), Some(&Value::Int(1)));
}

#[test]
fn exclusive_flag_survives_later_registration() {
    let taylor = taylor(product().rule("name", Rule::Presence));
    taylor.register_exclusive_specification("product", AttributeSet::new);
    taylor.register_specification("product", AttributeSet::new);

    let record = taylor.generate("product", attributes()).expect("generate");
    assert!(record.attributes().is_empty());
}

#[test]
fn seeded_facades_agree() {
    let entity = product()
        .rule("name", Rule::Presence)
        .rule("amount", Rule::Numericality(Numericality::less_than(1000.0)));
    let options = GenerateOptions {
        seed: Some(7),
        ..GenerateOptions::default()
    };
    let left = Taylor::with_options(
        DescribedCatalog::new().with(entity.clone()),
        RecordConstructor::new(),
        options.clone(),
    );
    let right = Taylor::with_options(
        DescribedCatalog::new().with(entity),
        RecordConstructor::new(),
        options,
    );

    for _ in 0..10 {
        let a = left.generate("product", attributes()).expect("generate");
        let b = right.generate("product", attributes()).expect("generate");
        assert_eq!(a, b);
    }
}
