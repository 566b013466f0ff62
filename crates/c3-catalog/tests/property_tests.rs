use c3_catalog::search::{classify, match_name, MatchKind, NameMatch};
use c3_catalog::{normalize, Record};
use proptest::prelude::*;

fn record_with(ingredients: Vec<Vec<String>>) -> Record {
    Record {
        name: "Test".to_string(),
        ingredients,
        garnish: "None".to_string(),
        instructions: vec!["stir".to_string()],
    }
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(name in ".{0,40}") {
        let once = normalize(&name);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalize_has_no_spaces_or_uppercase(name in "[A-Za-z ]{0,30}") {
        let key = normalize(&name);
        prop_assert!(!key.contains(' '));
        prop_assert!(!key.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn prop_merge_strictly_appends(
        base in prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 1..4), 1..4),
        extra in prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 1..4), 1..3),
    ) {
        let merged = record_with(base.clone()).merge_variations(extra.clone());
        let mut expected = base;
        expected.extend(extra);
        prop_assert_eq!(merged.ingredients, expected);
    }

    #[test]
    fn prop_classification_matches_term_count(
        ingredients in prop::collection::vec("[a-z]{1,6}", 1..6),
        wanted in prop::collection::vec("[a-z]{1,3}", 1..4),
    ) {
        let record = record_with(vec![ingredients.clone()]);
        let found = wanted
            .iter()
            .filter(|w| ingredients.iter().any(|i| i.contains(w.as_str())))
            .count();
        let kind = classify(&record, &wanted);
        let expected = if found == 0 {
            MatchKind::Absent
        } else if found == wanted.len() {
            MatchKind::Full
        } else {
            MatchKind::Partial
        };
        prop_assert_eq!(kind, expected);
    }

    #[test]
    fn prop_exact_match_found_for_every_key(
        names in prop::collection::btree_set("[a-z]{1,10}", 1..8),
    ) {
        let keys: Vec<String> = names.into_iter().collect();
        for key in &keys {
            let upper = key.to_uppercase();
            prop_assert_eq!(match_name(&keys, &upper), NameMatch::Exact(key.clone()));
        }
    }
}
