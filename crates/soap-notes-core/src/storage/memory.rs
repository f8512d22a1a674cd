//! In-process key-value store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{KeyValueStore, StorageResult};

/// Volatile store backed by a shared map.
///
/// Clones share the same map, so a test can keep a handle and inspect what a
/// [`PatientStore`](crate::store::PatientStore) wrote, or reopen a store over
/// the same data to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic elsewhere cannot leave a half-written String behind.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.slots().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
