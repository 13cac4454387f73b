//! Namespaced, typed JSON document store

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::StorageError;

use super::key_value::KeyValueStorage;

/// On-disk wrapper stamping every document with its schema version
#[derive(Serialize, Deserialize)]
struct VersionedDocument<T> {
    version: u32,
    state: T,
}

/// Typed, versioned JSON document layered over a [`KeyValueStorage`] namespace
///
/// Loading an absent document yields the defaults supplied at construction,
/// so first-run state needs no special casing in callers. A document
/// written under a different schema version also falls back to defaults:
/// stale state is recoverable, a misread of it is not.
pub struct JsonStore<T> {
    storage: Arc<dyn KeyValueStorage>,
    namespace: String,
    version: u32,
    defaults: T,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        namespace: impl Into<String>,
        version: u32,
        defaults: T,
    ) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
            version,
            defaults,
        }
    }

    /// Load the stored document, or the defaults when none is usable
    pub async fn load(&self) -> Result<T, StorageError> {
        let Some(document) = self.storage.load(&self.namespace).await? else {
            return Ok(self.defaults.clone());
        };
        let decoded: VersionedDocument<T> = serde_json::from_str(&document)?;
        if decoded.version != self.version {
            warn!(
                namespace = %self.namespace,
                stored = decoded.version,
                expected = self.version,
                "discarding persisted document with incompatible version"
            );
            return Ok(self.defaults.clone());
        }
        Ok(decoded.state)
    }

    /// Encode and persist `value` as this namespace's document
    pub async fn save(&self, value: &T) -> Result<(), StorageError> {
        let document = serde_json::to_string(&VersionedDocument {
            version: self.version,
            state: value.clone(),
        })?;
        self.storage.store(&self.namespace, &document).await
    }
}
