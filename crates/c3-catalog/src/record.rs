//! Cocktail record model
//!
//! A [`Record`] is the unit stored in the catalog and held by the proposal
//! registries. It has two encodings:
//! - the human-readable text form ([`Display`](std::fmt::Display)), shown to
//!   users and moderators, never parsed back;
//! - the JSON form stored at `<key>/spec`.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Garnish used when none was supplied
pub const DEFAULT_GARNISH: &str = "None";

/// One alternative ingredient list within a record
pub type Variation = Vec<String>;

/// A cocktail spec
///
/// Field names on the wire are `Name`, `Ingredients`, `Garnish` and
/// `Instructions`. Absent fields decode to their defaults; only syntactically
/// invalid JSON is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Ingredient variations, in order
    #[serde(default)]
    pub ingredients: Vec<Variation>,
    /// Free-text garnish
    #[serde(default = "default_garnish")]
    pub garnish: String,
    /// Instruction steps, in order
    #[serde(default)]
    pub instructions: Vec<String>,
}

fn default_garnish() -> String {
    DEFAULT_GARNISH.to_string()
}

impl Record {
    /// Create a single-variation record
    ///
    /// Inputs are expected to be validated by the caller.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ingredients: Variation,
        instructions: Vec<String>,
        garnish: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients: vec![ingredients],
            garnish: garnish.unwrap_or_else(default_garnish),
            instructions,
        }
    }

    /// Create a variation proposal targeting an existing record
    ///
    /// Only `name` and `ingredients` carry meaning; the rest stay at their defaults.
    #[must_use]
    pub fn variation(name: impl Into<String>, ingredients: Variation) -> Self {
        Self {
            name: name.into(),
            ingredients: vec![ingredients],
            garnish: default_garnish(),
            instructions: Vec::new(),
        }
    }

    /// Append variations, keeping existing ones in place
    #[must_use]
    pub fn merge_variations(mut self, new: impl IntoIterator<Item = Variation>) -> Self {
        self.ingredients.extend(new);
        self
    }

    /// Iterate over every ingredient of every variation
    pub fn all_ingredients(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().flatten().map(String::as_str)
    }

    /// Encode as stored JSON
    ///
    /// # Errors
    /// - `CatalogError::Encode` if serialization fails
    pub fn to_json(&self) -> Result<Vec<u8>, CatalogError> {
        serde_json::to_vec(self).map_err(CatalogError::Encode)
    }

    /// Decode stored JSON found at `key`
    ///
    /// # Errors
    /// - `CatalogError::Decode` if the bytes are not a JSON record
    pub fn from_json(key: &str, data: &[u8]) -> Result<Self, CatalogError> {
        serde_json::from_slice(data).map_err(|source| CatalogError::Decode {
            key: key.to_string(),
            source,
        })
    }

    fn ingredients_body(&self) -> String {
        if let [only] = self.ingredients.as_slice() {
            return join_trimmed(only);
        }

        let mut body = String::new();
        for (i, variation) in self.ingredients.iter().enumerate() {
            body.push_str(&format!("*Variation {}:*\n", i + 1));
            for ingredient in variation {
                body.push_str(ingredient.trim());
                body.push('\n');
            }
            body.push('\n');
        }
        body.trim().to_string()
    }
}

fn join_trimmed(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\n\nIngredients:\n{}\n\nGarnish: {}\n\nInstructions:\n{}",
            self.name,
            self.ingredients_body(),
            self.garnish,
            join_trimmed(&self.instructions),
        )
    }
}
