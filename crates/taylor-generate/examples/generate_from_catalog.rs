use std::env;
use std::fs;
use std::path::PathBuf;

use taylor_core::{AttributeSet, DescribedCatalog, load_catalog};
use taylor_generate::{GenerateOptions, MemoryStore, RecordConstructor, Taylor, init_logging};

fn main() {
    let mut args = env::args().skip(1);
    let catalog_path = args.next().map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../taylor-core/tests/fixtures/shop.catalog.json")
    });
    let entity = args.next().unwrap_or_else(|| "product".to_string());

    let options = match env::var("TAYLOR_OPTIONS") {
        Ok(path) => {
            let contents = fs::read_to_string(&path).expect("read options");
            GenerateOptions::from_toml_str(&contents).expect("parse options")
        }
        Err(_) => GenerateOptions::default(),
    };
    init_logging(&options.logging).expect("init logging");

    let contents = fs::read_to_string(&catalog_path).expect("read catalog");
    let json: serde_json::Value = serde_json::from_str(&contents).expect("parse catalog json");
    let description = load_catalog(&json).expect("load catalog");
    let constructor = RecordConstructor::from_catalog(&description);
    let catalog = DescribedCatalog::from_description(description);

    let store = MemoryStore::validating(catalog.clone());
    let taylor = Taylor::with_options(catalog, constructor, options);
    let record = taylor
        .generate_and_persist(&store, entity, AttributeSet::new())
        .expect("generate");

    println!("{} {}", record.entity(), record.id().map(|id| id.to_string()).unwrap_or_default());
    for (name, value) in record.attributes().iter() {
        println!("  {name} = {value:?}");
    }
}
