//! Filesystem-backed object store
//!
//! Object `a/b/c` lives at `<root>/a/b/c`. Directories play the role of
//! bucket prefixes, so there are no directory-marker objects.

use super::{content_type_for, ObjectMeta, ObjectReader, ObjectStore};
use crate::error::StoreError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Object store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create store rooted at `root` (created lazily on first write)
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if name.is_empty() || escapes {
            return Err(StoreError::backend(format!("invalid object name: {name:?}")));
        }
        Ok(self.root.join(relative))
    }

    fn dir_for_prefix(&self, prefix: &str) -> Result<PathBuf, StoreError> {
        match prefix.rsplit_once('/') {
            Some((dir, _)) if !dir.is_empty() => self.path_for(dir),
            _ => Ok(self.root.clone()),
        }
    }

    fn name_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }
}

fn map_io(name: &str, err: std::io::Error) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound(name.to_string())
    } else {
        StoreError::io(name, err)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.dir_for_prefix(prefix)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(prefix, e)),
        };

        let mut prefixes = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(prefix, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(prefix, e))?
                .is_dir();
            if !is_dir {
                continue;
            }
            if let Some(name) = self.name_for(&entry.path()) {
                let candidate = format!("{name}/");
                if candidate.starts_with(prefix) {
                    prefixes.push(candidate);
                }
            }
        }
        prefixes.sort();
        Ok(prefixes)
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        let mut pending = vec![self.dir_for_prefix(prefix)?];
        let mut objects = Vec::new();

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::io(prefix, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::io(prefix, e))?
            {
                let path = entry.path();
                let metadata = entry
                    .metadata()
                    .await
                    .map_err(|e| StoreError::io(prefix, e))?;
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(name) = self.name_for(&path) else {
                    continue;
                };
                if name.starts_with(prefix) {
                    objects.push(ObjectMeta {
                        content_type: content_type_for(&name),
                        name,
                        size: metadata.len(),
                    });
                }
            }
        }
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(name)?;
        tokio::fs::read(&path).await.map_err(|e| map_io(name, e))
    }

    async fn open(&self, name: &str) -> Result<ObjectReader, StoreError> {
        let path = self.path_for(name)?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| map_io(name, e))?;
        let size = file.metadata().await.map_err(|e| map_io(name, e))?.len();
        let meta = ObjectMeta {
            name: name.to_string(),
            size,
            content_type: content_type_for(name),
        };
        Ok(ObjectReader::new(meta, file))
    }

    async fn write(
        &self,
        name: &str,
        data: Vec<u8>,
        _content_type: Option<String>,
    ) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(name, e))?;
        }
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| StoreError::io(name, e))
    }
}
