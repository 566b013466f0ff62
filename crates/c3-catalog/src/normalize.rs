//! Name normalization
//!
//! A single canonical form is used for storage keys, proposal keys and every
//! "is this the same cocktail" comparison.

/// Canonicalize a display name into a catalog key.
///
/// Trims surrounding whitespace, lowercases, and replaces every space with `-`.
///
/// ```
/// assert_eq!(c3_catalog::normalize("  Dark and Stormy "), "dark-and-stormy");
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Check whether two names refer to the same catalog entry
#[inline]
#[must_use]
pub fn same_entry(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_hyphenates() {
        assert_eq!(normalize("Old Fashioned"), "old-fashioned");
    }

    #[test]
    fn normalize_trims() {
        assert_eq!(normalize("  Negroni\t"), "negroni");
    }

    #[test]
    fn normalize_replaces_each_space() {
        // runs are not collapsed, every space becomes a hyphen
        assert_eq!(normalize("Mai  Tai"), "mai--tai");
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn same_entry_ignores_case() {
        assert!(same_entry("Margarita", "margarita"));
        assert!(same_entry("Corpse Reviver", "corpse-reviver"));
        assert!(!same_entry("Martini", "Margarita"));
    }
}
