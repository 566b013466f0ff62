//! User-visible reply texts

use c3_catalog::{IngredientMatches, Record};
use std::fmt::Write as _;

/// Generic reply for internal failures
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";

/// Reply when `random` finds nothing to show
pub const EMPTY_CATALOG: &str = "I don't know about any cocktails yet.";

/// Location shown for proposals made outside a guild
pub const DIRECT_MESSAGE_LOCATION: &str = "DM";

/// Several keys matched a name search
#[must_use]
pub fn multiple_matches(keys: &[String]) -> String {
    let mut out = String::from("Multiple matches:\n");
    for key in keys {
        let _ = writeln!(out, "{key}");
    }
    out
}

/// Nothing matched a name search
#[must_use]
pub fn no_matches(query: &str) -> String {
    format!("No matches, for {query:?}")
}

/// Every catalog key, indented
#[must_use]
pub fn catalog_listing(keys: &[String]) -> String {
    let mut out = format!("I currently know about {} cocktails:\n", keys.len());
    for key in keys {
        let _ = writeln!(out, "    {key}");
    }
    out
}

/// Ingredient search summary
#[must_use]
pub fn ingredient_results(matches: &IngredientMatches) -> String {
    let terms = &matches.wanted;
    if matches.is_empty() {
        return format!("Search for cocktails containing {terms:?} resulted in no matches");
    }

    let mut out = format!(
        "Search for cocktails containing {terms:?} resulted in {} full matches and {} partial matches:\n",
        matches.full.len(),
        matches.partial.len()
    );
    for (label, keys) in [("full", &matches.full), ("partial", &matches.partial)] {
        if keys.is_empty() {
            continue;
        }
        let _ = writeln!(out, "**{} {label} matches:**", keys.len());
        for key in keys {
            let _ = writeln!(out, "    {key}");
        }
    }
    out
}

/// A proposal collides with an existing entry
#[must_use]
pub fn already_exists(key: &str) -> String {
    format!("{key} already exists, maybe try adding a variation?")
}

/// Confirmation to the proposer of a new record
#[must_use]
pub fn proposal_waiting(record: &Record) -> String {
    format!("Spec waiting on approval, you can edit by running create again:\n{record}")
}

/// Confirmation to the proposer of a variation
#[must_use]
pub fn variation_waiting(record: &Record) -> String {
    format!(
        "Variation waiting on approval, you can edit by running 'create-variation' again:\n{record}"
    )
}

/// Moderator notice for a new record proposal
#[must_use]
pub fn proposal_submitted(user: &str, location: Option<&str>, record: &Record) -> String {
    let location = location.unwrap_or(DIRECT_MESSAGE_LOCATION);
    format!("Spec submitted by {user:?} in {location:?}:\n{record}")
}

/// Moderator notice for a variation proposal
#[must_use]
pub fn variation_submitted(user: &str, location: Option<&str>, record: &Record) -> String {
    let location = location.unwrap_or(DIRECT_MESSAGE_LOCATION);
    format!("Variation submitted by {user:?} in {location:?}:\n{record}")
}

/// A variation was proposed for an unknown entry
#[must_use]
pub fn variation_target_missing(name: &str) -> String {
    format!("{name} not found, can't propose variation")
}

/// A new record was committed
#[must_use]
pub fn approved_uploaded(name: &str) -> String {
    format!("{name:?} approved and uploaded.")
}

/// A variation was merged into its entry
#[must_use]
pub fn approved_updated(name: &str) -> String {
    format!("{name:?} approved and updated.")
}

/// Approval hit an entry that already exists
#[must_use]
pub fn approve_conflict(name: &str) -> String {
    format!("{name:?} already exists in the catalog")
}

/// A proposal was dropped
#[must_use]
pub fn denied(name: &str) -> String {
    format!("{name:?} denied")
}

/// Listing of pending proposals; `noun` is `proposals` or `variations`
#[must_use]
pub fn pending_listing(noun: &str, records: &[Record]) -> String {
    let mut out = format!("{} {noun} pending\n\n", records.len());
    for record in records {
        let _ = write!(out, "{record}\n\n");
    }
    out
}

/// Picture upload named an unknown entry
#[must_use]
pub fn upload_target_missing(name: &str) -> String {
    format!("Cocktail not found: {name}")
}

/// Picture upload finished
#[must_use]
pub fn attachments_uploaded(key: &str) -> String {
    format!("Attachments uploaded for {key}")
}
