//! Testing utilities for C3 workspace
//!
//! Shared fixtures: record builders and seeded in-memory catalogs.

#![allow(missing_docs)]

use c3_catalog::{normalize, Catalog, MemoryStore, Record};
use std::sync::Arc;

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Record with the given variations and a single "stir" instruction
pub fn record(name: &str, variations: &[&[&str]]) -> Record {
    Record {
        name: name.to_string(),
        ingredients: variations.iter().map(|v| strings(v)).collect(),
        garnish: c3_catalog::DEFAULT_GARNISH.to_string(),
        instructions: strings(&["stir"]),
    }
}

pub fn mojito() -> Record {
    record("Mojito", &[&["rum", "mint", "lime"]])
}

pub fn margarita() -> Record {
    record("Margarita", &[&["tequila", "lime", "triple sec"]])
}

pub fn martini() -> Record {
    record("Martini", &[&["gin", "dry vermouth"]])
}

/// Store `record` under its normalized key
pub fn seed(store: &MemoryStore, record: &Record) {
    let json = record.to_json().expect("record encodes");
    store.insert(format!("{}/spec", normalize(&record.name)), json);
}

/// In-memory catalog at the store root holding `records`
pub fn seeded_catalog(records: &[Record]) -> (Arc<MemoryStore>, Catalog) {
    let store = Arc::new(MemoryStore::new());
    for r in records {
        seed(&store, r);
    }
    let catalog = Catalog::new(store.clone(), "");
    (store, catalog)
}
