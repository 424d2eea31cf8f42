//! In-memory blob store used for tests and ephemeral development servers.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::ports::{BlobStore, BlobStoreError, validate_blob_key};

/// Process-local blob store guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, key: &str) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, BlobStoreError> {
        self.entries
            .lock()
            .map_err(|_| BlobStoreError::io(key, "in-memory store lock poisoned"))
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        validate_blob_key(key)?;
        Ok(self.lock(key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), BlobStoreError> {
        validate_blob_key(key)?;
        self.lock(key)?.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobStoreError> {
        validate_blob_key(key)?;
        self.lock(key)?.remove(key);
        Ok(())
    }

    fn compare_and_set(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, BlobStoreError> {
        validate_blob_key(key)?;
        let mut entries = self.lock(key)?;
        if entries.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        entries.insert(key.to_owned(), value.to_vec());
        Ok(true)
    }
}
