//! Catalog query layer
//!
//! Maps catalog operations onto the object-store layout:
//!
//! ```text
//! <root>/<key>/spec             JSON record
//! <root>/<key>/pictures/<file>  image blobs
//! ```
//!
//! The catalog holds no mutable state; every call goes straight to the store
//! and is attempted exactly once.

use crate::error::{CatalogError, StoreError};
use crate::normalize::same_entry;
use crate::record::Record;
use crate::store::{self, ObjectStore};
use rand::seq::IndexedRandom;
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

const SPEC_OBJECT: &str = "spec";
const PICTURES_DIR: &str = "pictures";

/// How [`Catalog::commit_record`] treats an existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// New entry; fails with `Conflict` if the normalized key is taken
    Create,
    /// Overwrite whatever is stored at the key
    Replace,
}

/// A picture chosen for display, holding its open stream
///
/// The stream is released exactly once: when the picture is read with
/// [`Picture::read_all`], released with [`Picture::release`], or dropped.
pub struct Picture {
    /// Base file name
    pub file_name: String,
    /// MIME type, when known
    pub content_type: Option<String>,
    /// Size in bytes reported by the store
    pub size: u64,
    object: String,
    body: Box<dyn AsyncRead + Send + Unpin>,
}

impl Picture {
    fn from_reader(reader: store::ObjectReader) -> Self {
        let file_name = reader
            .meta
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            file_name,
            content_type: reader.meta.content_type,
            size: reader.meta.size,
            object: reader.meta.name,
            body: reader.body,
        }
    }

    /// Read the whole picture, releasing the stream
    ///
    /// # Errors
    /// - `StoreError::Io` if the stream fails mid-read
    pub async fn read_all(mut self) -> Result<Vec<u8>, StoreError> {
        let capacity = usize::try_from(self.size).unwrap_or(0);
        let mut buf = Vec::with_capacity(capacity);
        self.body
            .read_to_end(&mut buf)
            .await
            .map_err(|e| StoreError::io(self.object.clone(), e))?;
        Ok(buf)
    }

    /// Release the stream without reading it
    #[inline]
    pub fn release(self) {}
}

impl Drop for Picture {
    fn drop(&mut self) {
        tracing::trace!(object = %self.object, "picture stream released");
    }
}

impl fmt::Debug for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picture")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// A catalog entry ready to show
#[derive(Debug)]
pub struct Entry {
    /// Catalog key
    pub key: String,
    /// Stored record
    pub record: Record,
    /// One random picture, if the entry has any
    pub picture: Option<Picture>,
}

/// Cocktail catalog over an object store
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn ObjectStore>,
    root: String,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog").field("root", &self.root).finish_non_exhaustive()
    }
}

impl Catalog {
    /// Create catalog rooted at `root` (empty for the store root)
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, root: impl AsRef<str>) -> Self {
        let trimmed = root.as_ref().trim_matches('/');
        let root = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };
        Self { store, root }
    }

    /// Root prefix, empty or ending in `/`
    #[inline]
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    fn object_name(&self, key: &str, leaf: &str) -> String {
        store::join(&[self.root.as_str(), key, leaf])
    }

    /// List every catalog key
    ///
    /// # Errors
    /// - `CatalogError::StoreUnavailable` if the listing fails
    pub async fn list_keys(&self) -> Result<Vec<String>, CatalogError> {
        let prefixes = self
            .store
            .list_prefixes(&self.root)
            .await
            .map_err(CatalogError::StoreUnavailable)?;

        Ok(prefixes
            .iter()
            .map(|p| p.strip_prefix(&self.root).unwrap_or(p))
            .map(|p| p.trim_end_matches('/').to_string())
            .filter(|k| !k.is_empty())
            .collect())
    }

    /// Find the stored key for a user-supplied name
    ///
    /// # Errors
    /// - `CatalogError::StoreUnavailable` if the listing fails
    pub async fn find_key(&self, name: &str) -> Result<Option<String>, CatalogError> {
        Ok(self
            .list_keys()
            .await?
            .into_iter()
            .find(|key| same_entry(key, name)))
    }

    /// Fetch and decode the record stored at `key`
    ///
    /// # Errors
    /// - `CatalogError::NotFound` if no spec is stored
    /// - `CatalogError::Decode` if the spec is malformed
    /// - `CatalogError::StoreUnavailable` on store failure
    pub async fn fetch_record(&self, key: &str) -> Result<Record, CatalogError> {
        let name = self.object_name(key, SPEC_OBJECT);
        let data = self.store.read(&name).await.map_err(|e| match e {
            StoreError::NotFound(_) => CatalogError::NotFound(key.to_string()),
            other => CatalogError::StoreUnavailable(other),
        })?;
        Record::from_json(key, &data)
    }

    /// Pick one picture of `key` at random and open it
    ///
    /// Returns `None` when the entry has no pictures.
    ///
    /// # Errors
    /// - `CatalogError::StoreUnavailable` if listing or opening fails
    pub async fn fetch_random_picture(&self, key: &str) -> Result<Option<Picture>, CatalogError> {
        let prefix = format!("{}/", self.object_name(key, PICTURES_DIR));
        let names: Vec<String> = self
            .store
            .list_objects(&prefix)
            .await
            .map_err(CatalogError::StoreUnavailable)?
            .into_iter()
            .map(|meta| meta.name)
            .filter(|name| *name != prefix)
            .collect();

        let Some(name) = names.choose(&mut rand::rng()).cloned() else {
            tracing::debug!(%key, "no pictures");
            return Ok(None);
        };
        tracing::debug!(%key, picture = %name, "selected picture");

        let reader = self
            .store
            .open(&name)
            .await
            .map_err(CatalogError::StoreUnavailable)?;
        Ok(Some(Picture::from_reader(reader)))
    }

    /// Fetch a record together with one random picture
    ///
    /// # Errors
    /// Same as [`fetch_record`](Self::fetch_record) and
    /// [`fetch_random_picture`](Self::fetch_random_picture).
    pub async fn fetch_entry(&self, key: &str) -> Result<Entry, CatalogError> {
        let record = self.fetch_record(key).await?;
        let picture = self.fetch_random_picture(key).await?;
        Ok(Entry {
            key: key.to_string(),
            record,
            picture,
        })
    }

    /// Pick a catalog entry at random
    ///
    /// # Errors
    /// - `CatalogError::Empty` if the catalog has no entries
    /// - any error from [`fetch_record`](Self::fetch_record)
    pub async fn fetch_random_entry(&self) -> Result<(String, Record), CatalogError> {
        let keys = self.list_keys().await?;
        let key = keys
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(CatalogError::Empty)?;
        tracing::debug!(%key, "selected random entry");
        let record = self.fetch_record(&key).await?;
        Ok((key, record))
    }

    /// Write serialized record bytes to `<key>/spec`
    ///
    /// Record and picture writes are independent; nothing here is transactional.
    ///
    /// # Errors
    /// - `CatalogError::Conflict` in `Create` mode when an entry with the same
    ///   normalized key exists
    /// - `CatalogError::StoreUnavailable` on store failure
    pub async fn commit_record(
        &self,
        key: &str,
        payload: Vec<u8>,
        mode: WriteMode,
    ) -> Result<(), CatalogError> {
        if mode == WriteMode::Create {
            if let Some(existing) = self.find_key(key).await? {
                return Err(CatalogError::Conflict {
                    key: key.to_string(),
                    existing,
                });
            }
        }

        let name = self.object_name(key, SPEC_OBJECT);
        self.store
            .write(&name, payload, Some("application/json".to_string()))
            .await
            .map_err(CatalogError::StoreUnavailable)?;
        tracing::info!(%key, ?mode, "record committed");
        Ok(())
    }

    /// Store a picture under `<key>/pictures/<file_name>`
    ///
    /// Only the last path segment of `file_name` is used.
    ///
    /// # Errors
    /// - `CatalogError::StoreUnavailable` on store failure
    pub async fn upload_picture(
        &self,
        key: &str,
        file_name: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<String, CatalogError> {
        let base = file_name
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .unwrap_or("picture");
        let name = store::join(&[self.root.as_str(), key, PICTURES_DIR, base]);
        self.store
            .write(&name, data, content_type)
            .await
            .map_err(CatalogError::StoreUnavailable)?;
        tracing::info!(%key, object = %name, "picture uploaded");
        Ok(name)
    }
}
