//! Object store seam
//!
//! The catalog only needs a bucket-like namespace of named blobs:
//! - list immediate "directory" prefixes under a prefix
//! - list objects under a prefix
//! - read, open and write a named object
//!
//! Backends:
//! - [`MemoryStore`]: in-process, used by tests and local runs
//! - [`FsStore`]: directory tree on local disk

pub mod fs;
pub mod memory;

pub use fs::FsStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use async_trait::async_trait;
use std::fmt;
use tokio::io::AsyncRead;

/// Object metadata returned by listings and opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Full object name (slash-separated)
    pub name: String,
    /// Content length in bytes
    pub size: u64,
    /// MIME type, when known
    pub content_type: Option<String>,
}

/// Open object stream
///
/// Dropping the reader releases the underlying handle.
pub struct ObjectReader {
    /// Metadata of the opened object
    pub meta: ObjectMeta,
    /// Object body
    pub body: Box<dyn AsyncRead + Send + Unpin>,
}

impl ObjectReader {
    /// Wrap an already-open stream
    #[must_use]
    pub fn new(meta: ObjectMeta, body: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            meta,
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for ObjectReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectReader")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Blob storage used by the catalog
///
/// Prefix listings follow bucket semantics: `list_prefixes("a/")` returns
/// `"a/x/"`, `"a/y/"` for objects `a/x/1` and `a/y/2`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List immediate sub-prefixes of `prefix`, each ending in `/`
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// List every object whose name starts with `prefix`
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError>;

    /// Read a whole object
    ///
    /// # Errors
    /// - `StoreError::NotFound` if the object does not exist
    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Open an object for streaming
    ///
    /// # Errors
    /// - `StoreError::NotFound` if the object does not exist
    async fn open(&self, name: &str) -> Result<ObjectReader, StoreError>;

    /// Create or overwrite an object
    async fn write(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<(), StoreError>;
}

/// Join object-name segments with `/`, skipping empty ones
#[must_use]
pub fn join(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Guess a MIME type from a file name
#[must_use]
pub fn content_type_for(name: &str) -> Option<String> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "json" => "application/json",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_empty_segments() {
        assert_eq!(join(&["", "mojito", "spec"]), "mojito/spec");
        assert_eq!(join(&["cocktails/", "mojito", "pictures/"]), "cocktails/mojito/pictures");
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for("a.PNG").as_deref(), Some("image/png"));
        assert_eq!(content_type_for("b.jpeg").as_deref(), Some("image/jpeg"));
        assert_eq!(content_type_for("spec"), None);
        assert_eq!(content_type_for("notes.txt"), None);
    }
}
