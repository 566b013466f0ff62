//! Error types for the C3 catalog
//!
//! Provides error handling for:
//! - Object store access ([`StoreError`])
//! - Catalog queries and commits ([`CatalogError`])

/// Errors raised by an [`ObjectStore`](crate::ObjectStore) backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Named object does not exist
    #[error("object not found: {0}")]
    NotFound(String),

    /// IO error while reading or writing an object
    #[error("io error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Backend-specific failure
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create IO error for object name
    pub fn io(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            name: name.into(),
            source,
        }
    }

    /// Create backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Check if the object was simply absent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors raised by the [`Catalog`](crate::Catalog)
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog entry absent
    #[error("catalog entry not found: {0}")]
    NotFound(String),

    /// Catalog has no entries at all
    #[error("catalog is empty")]
    Empty,

    /// Underlying store failed
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Stored record could not be decoded
    #[error("malformed record at {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Record could not be encoded
    #[error("record encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Another entry already owns the normalized key
    #[error("{key} conflicts with existing entry {existing}")]
    Conflict { key: String, existing: String },
}

impl CatalogError {
    /// Check if error means "nothing there" (absent entry or empty catalog)
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Empty)
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => Self::NotFound(name),
            other => Self::StoreUnavailable(other),
        }
    }
}
