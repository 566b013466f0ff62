//! In-memory object store

use super::{content_type_for, ObjectMeta, ObjectReader, ObjectStore};
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::io::Cursor;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: Option<String>,
}

/// Object store held in a concurrent map
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<String, StoredObject>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object directly, guessing its content type from the name
    pub fn insert(&self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let name = name.into();
        let content_type = content_type_for(&name);
        self.objects.insert(
            name,
            StoredObject {
                data: data.into(),
                content_type,
            },
        );
    }

    /// Raw bytes of an object, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.get(name).map(|o| o.data.clone())
    }

    /// Check if an object exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// All object names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of stored objects
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn meta(name: &str, object: &StoredObject) -> ObjectMeta {
        ObjectMeta {
            name: name.to_string(),
            size: object.data.len() as u64,
            content_type: object.content_type.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let prefixes: BTreeSet<String> = self
            .objects
            .iter()
            .filter_map(|entry| {
                let rest = entry.key().strip_prefix(prefix)?;
                let (segment, _) = rest.split_once('/')?;
                Some(format!("{prefix}{segment}/"))
            })
            .collect();
        Ok(prefixes.into_iter().collect())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        let mut objects: Vec<ObjectMeta> = self
            .objects
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| Self::meta(entry.key(), entry.value()))
            .collect();
        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn open(&self, name: &str) -> Result<ObjectReader, StoreError> {
        let object = self
            .objects
            .get(name)
            .map(|o| o.value().clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let meta = Self::meta(name, &object);
        Ok(ObjectReader::new(meta, Cursor::new(object.data)))
    }

    async fn write(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<(), StoreError> {
        let content_type = content_type.or_else(|| content_type_for(name));
        self.objects
            .insert(name.to_string(), StoredObject { data, content_type });
        Ok(())
    }
}
