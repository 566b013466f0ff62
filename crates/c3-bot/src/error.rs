//! Error types for command handling
//!
//! [`CommandError`] separates short, user-facing outcomes (not found,
//! not authorized, bad arguments) from internal failures that are logged
//! and reported generically.

use crate::transport::TransportError;
use c3_catalog::CatalogError;

/// Errors raised while handling a command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Proposal or catalog entry absent
    #[error("{0:?} not found")]
    NotFound(String),

    /// Actor is not the privileged user
    #[error("You're not my boss!")]
    Unauthorized,

    /// Missing or malformed command argument
    #[error("{0}")]
    Validation(String),

    /// Catalog or store failure
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Response could not be delivered
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl CommandError {
    /// Create validation error
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if the error message can be shown to the user as-is
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Unauthorized | Self::Validation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_quotes_name() {
        assert_eq!(
            CommandError::NotFound("Gimlet".to_string()).to_string(),
            "\"Gimlet\" not found"
        );
    }

    #[test]
    fn user_facing_classification() {
        assert!(CommandError::Unauthorized.is_user_facing());
        assert!(CommandError::validation("Must provide a name.").is_user_facing());
        assert!(!CommandError::Catalog(CatalogError::Empty).is_user_facing());
    }
}
