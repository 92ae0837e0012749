//! # Object Store
//!
//! The reconcilers read and write Kubernetes objects through [`ObjectStore`],
//! one instance per resource type. [`KubeStore`] talks to the API server; the
//! test-only in-memory store models the same contract (resource versions,
//! finalizers, owner-reference garbage collection).

mod api;
#[cfg(test)]
mod memory;

pub use api::KubeStore;
#[cfg(test)]
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        kind: String,
        namespace: String,
        name: String,
    },

    /// Optimistic concurrency failure: the object changed since it was read
    #[error("{kind} {namespace}/{name} was modified concurrently")]
    Conflict {
        kind: String,
        namespace: String,
        name: String,
    },

    #[error("{kind} {name} has no namespace")]
    MissingNamespace { kind: String, name: String },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("failed to convert object: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CRUD access to namespaced objects of one kind
#[async_trait]
pub trait ObjectStore<K>: Send + Sync
where
    K: Send + Sync,
{
    /// Fetch an object, `None` if it does not exist
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError>;

    /// Create an object in the namespace set in its metadata
    async fn create(&self, object: &K) -> Result<K, StoreError>;

    /// Replace an object. Fails with [`StoreError::Conflict`] if the object's
    /// resource version is stale.
    async fn replace(&self, object: &K) -> Result<K, StoreError>;

    /// Request deletion. Deleting a missing object succeeds.
    ///
    /// Objects with finalizers are only marked for deletion.
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError>;
}
