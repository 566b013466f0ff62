//! Proposal lifecycle against an in-memory catalog
//!
//! NONE -> PENDING -> COMMITTED, and NONE -> PENDING -> NONE.

use c3_catalog::{normalize, Catalog, CatalogError, MemoryStore, Proposals, Record, WriteMode};
use std::sync::Arc;

fn margarita() -> Record {
    Record::new(
        "Margarita",
        vec!["2oz tequila".into(), "1oz lime".into(), "1oz triple sec".into()],
        vec!["shake with ice".into(), "strain".into()],
        Some("salt rim".into()),
    )
}

fn setup() -> (Arc<MemoryStore>, Catalog, Proposals) {
    let store = Arc::new(MemoryStore::new());
    let catalog = Catalog::new(store.clone(), "");
    (store, catalog, Proposals::new())
}

#[tokio::test]
async fn approve_record_commits_identical_json() {
    let (store, catalog, proposals) = setup();
    let key = normalize("Margarita");
    proposals.records.add(key.clone(), margarita());

    let pending = proposals.records.get(&key).expect("pending");
    let payload = pending.to_json().unwrap();
    catalog
        .commit_record(&key, payload.clone(), WriteMode::Create)
        .await
        .unwrap();
    proposals.records.remove(&key);

    assert!(proposals.records.get(&key).is_none());
    assert_eq!(store.get("margarita/spec").unwrap(), payload);
    assert_eq!(catalog.fetch_record(&key).await.unwrap(), margarita());
}

#[tokio::test]
async fn approve_variation_appends_only() {
    let (_, catalog, proposals) = setup();
    let key = normalize("Margarita");
    catalog
        .commit_record(&key, margarita().to_json().unwrap(), WriteMode::Create)
        .await
        .unwrap();

    let variation = Record::variation("Margarita", vec!["2oz mezcal".into(), "1oz lime".into()]);
    proposals.variations.add(key.clone(), variation.clone());

    let pending = proposals.variations.get(&key).unwrap();
    let current = catalog.fetch_record(&normalize(&pending.name)).await.unwrap();
    let merged = current.clone().merge_variations(pending.ingredients);
    catalog
        .commit_record(&key, merged.to_json().unwrap(), WriteMode::Replace)
        .await
        .unwrap();
    proposals.variations.remove(&key);

    let stored = catalog.fetch_record(&key).await.unwrap();
    assert_eq!(stored.ingredients.len(), 2);
    assert_eq!(stored.ingredients[0], current.ingredients[0]);
    assert_eq!(stored.ingredients[1], variation.ingredients[0]);
    assert_eq!(stored.instructions, current.instructions);
    assert!(stored.to_string().contains("*Variation 2:*\n2oz mezcal\n1oz lime"));
}

#[tokio::test]
async fn deny_leaves_catalog_untouched() {
    let (store, _, proposals) = setup();
    proposals.records.add("margarita", margarita());

    assert!(proposals.records.remove("margarita").is_some());
    assert!(proposals.records.is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn duplicate_create_is_rejected_and_proposal_kept() {
    let (_, catalog, proposals) = setup();
    catalog
        .commit_record("margarita", margarita().to_json().unwrap(), WriteMode::Create)
        .await
        .unwrap();

    proposals.records.add("margarita", margarita());
    let err = catalog
        .commit_record("margarita", margarita().to_json().unwrap(), WriteMode::Create)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Conflict { .. }));
    assert!(proposals.records.get("margarita").is_some());
}

#[tokio::test]
async fn concurrent_proposals_from_many_tasks() {
    let proposals = Arc::new(Proposals::new());
    let mut tasks = Vec::new();
    for i in 0..32 {
        let proposals = Arc::clone(&proposals);
        tasks.push(tokio::spawn(async move {
            let name = format!("Drink {i}");
            proposals.records.add(normalize(&name), margarita());
            proposals.variations.add(normalize(&name), margarita());
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    assert_eq!(proposals.records.len(), 32);
    assert_eq!(proposals.variations.len(), 32);
}
