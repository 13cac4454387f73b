//! Key-value storage trait and in-memory backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::StorageError;

/// Backend storing one string document per namespace
///
/// Implementations wrap whatever the host environment provides (extension
/// local storage, a file, a database). The core only ever reads and writes
/// whole documents.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Load the document stored under `namespace`, if any
    async fn load(&self, namespace: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored under `namespace`
    async fn store(&self, namespace: &str, document: &str) -> Result<(), StorageError>;

    /// Delete the document stored under `namespace`; no-op if absent
    async fn remove(&self, namespace: &str) -> Result<(), StorageError>;
}

/// In-memory backend for tests and ephemeral contexts
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStorage {
    documents: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of a stored document, for test assertions
    pub fn raw_document(&self, namespace: &str) -> Option<String> {
        self.documents.lock().unwrap().get(namespace).cloned()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryKeyValueStorage {
    async fn load(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        Ok(self.documents.lock().unwrap().get(namespace).cloned())
    }

    async fn store(&self, namespace: &str, document: &str) -> Result<(), StorageError> {
        self.documents
            .lock()
            .unwrap()
            .insert(namespace.to_string(), document.to_string());
        Ok(())
    }

    async fn remove(&self, namespace: &str) -> Result<(), StorageError> {
        self.documents.lock().unwrap().remove(namespace);
        Ok(())
    }
}
