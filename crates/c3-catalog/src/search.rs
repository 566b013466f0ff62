//! Search/match engine
//!
//! - [`match_name`]: exact match on normalized keys, falling back to prefix matches
//! - [`search_ingredients`]: substring matching across every variation of every entry

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::normalize::{normalize, same_entry};
use crate::record::Record;
use futures::stream::{self, StreamExt};

/// Records fetched concurrently during an ingredient search
pub const INGREDIENT_FETCH_CONCURRENCY: usize = 8;

/// Outcome of a name lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    /// Normalized query equals a key
    Exact(String),
    /// No exact match, but exactly one key starts with the query
    Prefix(String),
    /// Several keys start with the query
    Ambiguous(Vec<String>),
    /// Nothing matched
    NotFound,
}

impl NameMatch {
    /// The selected key, when the lookup resolved to a single entry
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match self {
            Self::Exact(key) | Self::Prefix(key) => Some(key),
            Self::Ambiguous(_) | Self::NotFound => None,
        }
    }
}

/// Resolve a user-supplied name against catalog keys
#[must_use]
pub fn match_name(keys: &[String], query: &str) -> NameMatch {
    if let Some(key) = keys.iter().find(|k| same_entry(k, query)) {
        return NameMatch::Exact(key.clone());
    }

    let wanted = normalize(query);
    let mut matches: Vec<String> = keys
        .iter()
        .filter(|k| normalize(k).starts_with(&wanted))
        .cloned()
        .collect();

    match matches.len() {
        0 => NameMatch::NotFound,
        1 => NameMatch::Prefix(matches.remove(0)),
        _ => NameMatch::Ambiguous(matches),
    }
}

/// How well a record matches a set of wanted ingredients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Every wanted term appears
    Full,
    /// Some, but not all, wanted terms appear
    Partial,
    /// No wanted term appears
    Absent,
}

/// Split a comma-separated ingredient query into lowercase terms
///
/// Empty terms are dropped.
#[must_use]
pub fn parse_ingredient_query(query: &str) -> Vec<String> {
    query
        .split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Classify a record against lowercase `wanted` terms
///
/// A term counts once if it is a substring of any ingredient in any variation.
#[must_use]
pub fn classify(record: &Record, wanted: &[String]) -> MatchKind {
    let ingredients: Vec<String> = record.all_ingredients().map(str::to_lowercase).collect();
    let found = wanted
        .iter()
        .filter(|term| ingredients.iter().any(|i| i.contains(term.as_str())))
        .count();

    if found == 0 {
        MatchKind::Absent
    } else if found == wanted.len() {
        MatchKind::Full
    } else {
        MatchKind::Partial
    }
}

/// Result of an ingredient search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientMatches {
    /// Terms searched for
    pub wanted: Vec<String>,
    /// Keys containing every term, in catalog order
    pub full: Vec<String>,
    /// Keys containing some terms, in catalog order
    pub partial: Vec<String>,
    /// Keys skipped because their record could not be read
    pub skipped: Vec<String>,
}

impl IngredientMatches {
    /// Check if nothing matched
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full.is_empty() && self.partial.is_empty()
    }

    fn push(&mut self, key: String, kind: MatchKind) {
        match kind {
            MatchKind::Full => self.full.push(key),
            MatchKind::Partial => self.partial.push(key),
            MatchKind::Absent => {}
        }
    }
}

/// Search every catalog entry for the comma-separated ingredients in `query`
///
/// Entries whose record cannot be fetched are logged and skipped.
///
/// # Errors
/// - `CatalogError::StoreUnavailable` if the catalog listing fails
pub async fn search_ingredients(
    catalog: &Catalog,
    query: &str,
) -> Result<IngredientMatches, CatalogError> {
    let wanted = parse_ingredient_query(query);
    let mut result = IngredientMatches {
        wanted: wanted.clone(),
        ..IngredientMatches::default()
    };
    if wanted.is_empty() {
        return Ok(result);
    }

    let keys = catalog.list_keys().await?;
    let total = keys.len();

    let mut fetched = stream::iter(keys)
        .map(|key| async move {
            let record = catalog.fetch_record(&key).await;
            (key, record)
        })
        .buffered(INGREDIENT_FETCH_CONCURRENCY);

    while let Some((key, record)) = fetched.next().await {
        match record {
            Ok(record) => {
                let kind = classify(&record, &wanted);
                result.push(key, kind);
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "skipping unreadable record");
                result.skipped.push(key);
            }
        }
    }

    tracing::debug!(
        total,
        full = result.full.len(),
        partial = result.partial.len(),
        skipped = result.skipped.len(),
        "ingredient search finished"
    );
    Ok(result)
}
