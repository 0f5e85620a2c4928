//! `ObjectStore` kept in process memory, for local runs and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use url::Url;

use crate::domain::ports::{
    ObjectPath, ObjectPayload, ObjectStore, ObjectStoreError, StoredBlob, StoredObject,
};

use super::public_base;

const POISONED: &str = "object store lock poisoned";

/// Write-once photo store held in a map.
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<ObjectPath, StoredBlob>>,
    public_base: Url,
}

impl MemoryObjectStore {
    pub fn new(base: Url) -> Self {
        Self {
            objects: RwLock::default(),
            public_base: public_base::normalise(base),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        path: &ObjectPath,
        payload: ObjectPayload,
    ) -> Result<StoredObject, ObjectStoreError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| ObjectStoreError::write(path.as_str(), POISONED))?;
        if objects.contains_key(path) {
            return Err(ObjectStoreError::already_exists(path.as_str()));
        }
        let size = payload.bytes.len() as u64;
        objects.insert(
            path.clone(),
            StoredBlob {
                content_type: payload.content_type,
                bytes: payload.bytes,
            },
        );
        Ok(StoredObject {
            path: path.clone(),
            size,
        })
    }

    fn public_url(&self, stored: &StoredObject) -> Result<String, ObjectStoreError> {
        public_base::join(&self.public_base, &stored.path)
    }

    async fn get(&self, path: &ObjectPath) -> Result<Option<StoredBlob>, ObjectStoreError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| ObjectStoreError::read(path.as_str(), POISONED))?;
        Ok(objects.get(path).cloned())
    }
}
