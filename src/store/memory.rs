//! In-memory store for reconciler tests
//!
//! Objects of every kind live in one map so that owner-reference garbage
//! collection can cross kinds. The API server behaviour modelled here:
//!
//! - create assigns `uid`, `resourceVersion` and `creationTimestamp`
//! - replace requires a matching `resourceVersion` (when one is sent) and
//!   keeps server-owned metadata
//! - delete of an object with finalizers only sets `deletionTimestamp`;
//!   the object is removed once a replace empties its finalizers
//! - removing an object deletes its dependents (background propagation)

use super::{ObjectStore, StoreError};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use k8s_openapi::NamespaceResourceScope;
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

type Key = (String, String, String);

#[derive(Debug, Default)]
struct Inner {
    objects: BTreeMap<Key, Value>,
    next_version: u64,
    next_uid: u64,
    writes: usize,
}

impl Inner {
    fn bump_version(&mut self, object: &mut Value) {
        self.next_version += 1;
        object["metadata"]["resourceVersion"] = json!(self.next_version.to_string());
    }

    fn assign_identity(&mut self, object: &mut Value) {
        if object["metadata"]["uid"].as_str().is_none() {
            self.next_uid += 1;
            object["metadata"]["uid"] = json!(format!("uid-{}", self.next_uid));
        }
        if object["metadata"]["creationTimestamp"].is_null() {
            object["metadata"]["creationTimestamp"] = json!(now());
        }
        self.bump_version(object);
    }

    /// Delete one object the way the API server does
    fn delete(&mut self, key: &Key) {
        let Some(object) = self.objects.get(key) else {
            return;
        };
        let has_finalizers = object["metadata"]["finalizers"]
            .as_array()
            .is_some_and(|f| !f.is_empty());
        if has_finalizers {
            if object["metadata"]["deletionTimestamp"].is_null() {
                let mut object = object.clone();
                object["metadata"]["deletionTimestamp"] = json!(now());
                self.bump_version(&mut object);
                self.objects.insert(key.clone(), object);
            }
        } else {
            self.remove(key);
        }
    }

    /// Remove an object and garbage collect its dependents
    fn remove(&mut self, key: &Key) {
        let Some(object) = self.objects.remove(key) else {
            return;
        };
        let Some(uid) = object["metadata"]["uid"].as_str() else {
            return;
        };
        let dependents: Vec<Key> = self
            .objects
            .iter()
            .filter(|(_, candidate)| {
                candidate["metadata"]["ownerReferences"]
                    .as_array()
                    .is_some_and(|refs| refs.iter().any(|r| r["uid"].as_str() == Some(uid)))
            })
            .map(|(key, _)| key.clone())
            .collect();
        for dependent in dependents {
            self.delete(&dependent);
        }
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn key<K>(namespace: &str, name: &str) -> Key
where
    K: Resource<DynamicType = ()>,
{
    (K::kind(&()).to_string(), namespace.to_owned(), name.to_owned())
}

fn key_of<K>(object: &K) -> Result<Key, StoreError>
where
    K: Resource<DynamicType = ()>,
{
    let namespace = object.namespace().ok_or_else(|| StoreError::MissingNamespace {
        kind: K::kind(&()).to_string(),
        name: object.name_any(),
    })?;
    Ok(key::<K>(&namespace, &object.name_any()))
}

fn not_found(key: Key) -> StoreError {
    let (kind, namespace, name) = key;
    StoreError::NotFound {
        kind,
        namespace,
        name,
    }
}

/// Shared in-memory object store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    /// Insert an object as-is, bypassing write accounting
    ///
    /// Metadata set on the object (creation time, finalizers, deletion time)
    /// is kept, missing identity fields are filled in.
    pub fn seed<K>(&self, object: &K) -> K
    where
        K: Resource<DynamicType = ()> + Serialize + DeserializeOwned,
    {
        let key = key_of(object).expect("seeded objects need a namespace");
        let mut value = serde_json::to_value(object).expect("object serializes");
        let mut inner = self.lock();
        inner.assign_identity(&mut value);
        inner.objects.insert(key, value.clone());
        serde_json::from_value(value).expect("object deserializes")
    }

    /// Read an object without going through the trait
    pub fn fetch<K>(&self, namespace: &str, name: &str) -> Option<K>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned,
    {
        self.lock()
            .objects
            .get(&key::<K>(namespace, name))
            .map(|value| serde_json::from_value(value.clone()).expect("object deserializes"))
    }

    /// Number of create, replace and delete calls so far
    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

#[async_trait]
impl<K> ObjectStore<K> for MemoryStore
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError> {
        let inner = self.lock();
        match inner.objects.get(&key::<K>(namespace, name)) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn create(&self, object: &K) -> Result<K, StoreError> {
        let key = key_of(object)?;
        let mut value = serde_json::to_value(object)?;
        let mut inner = self.lock();
        inner.writes += 1;
        if inner.objects.contains_key(&key) {
            let (kind, namespace, name) = key;
            return Err(StoreError::AlreadyExists {
                kind,
                namespace,
                name,
            });
        }
        if let Some(metadata) = value["metadata"].as_object_mut() {
            metadata.remove("uid");
            metadata.remove("creationTimestamp");
            metadata.remove("deletionTimestamp");
        }
        inner.assign_identity(&mut value);
        inner.objects.insert(key, value.clone());
        Ok(serde_json::from_value(value)?)
    }

    async fn replace(&self, object: &K) -> Result<K, StoreError> {
        let key = key_of(object)?;
        let mut value = serde_json::to_value(object)?;
        let mut inner = self.lock();
        inner.writes += 1;
        let Some(current) = inner.objects.get(&key).cloned() else {
            return Err(not_found(key));
        };

        let sent_version = value["metadata"]["resourceVersion"].as_str();
        if sent_version.is_some_and(|v| Some(v) != current["metadata"]["resourceVersion"].as_str())
        {
            let (kind, namespace, name) = key;
            return Err(StoreError::Conflict {
                kind,
                namespace,
                name,
            });
        }

        for field in ["uid", "creationTimestamp", "deletionTimestamp"] {
            value["metadata"][field] = current["metadata"][field].clone();
        }
        if let Some(metadata) = value["metadata"].as_object_mut() {
            metadata.retain(|_, v| !v.is_null());
        }

        let deleting = !value["metadata"]["deletionTimestamp"].is_null();
        let finalized = value["metadata"]["finalizers"]
            .as_array()
            .is_none_or(Vec::is_empty);
        inner.bump_version(&mut value);
        inner.objects.insert(key.clone(), value.clone());
        if deleting && finalized {
            inner.remove(&key);
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.writes += 1;
        inner.delete(&key::<K>(namespace, name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{ConfigMap, Secret};
    use kube::api::ObjectMeta;

    fn config_map(name: &str) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                namespace: Some("test".to_owned()),
                ..ObjectMeta::default()
            },
            ..ConfigMap::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let store = MemoryStore::new();
        let created = ObjectStore::<ConfigMap>::create(&store, &config_map("a"))
            .await
            .unwrap();
        assert!(created.metadata.uid.is_some());
        assert!(created.metadata.resource_version.is_some());
        assert!(created.metadata.creation_timestamp.is_some());

        let err = ObjectStore::<ConfigMap>::create(&store, &config_map("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_replace_detects_conflicts() {
        let store = MemoryStore::new();
        let created = ObjectStore::<ConfigMap>::create(&store, &config_map("a"))
            .await
            .unwrap();
        let updated = ObjectStore::<ConfigMap>::replace(&store, &created)
            .await
            .unwrap();
        assert_ne!(
            updated.metadata.resource_version,
            created.metadata.resource_version
        );
        let err = ObjectStore::<ConfigMap>::replace(&store, &created)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_finalizers_block_removal() {
        let store = MemoryStore::new();
        let mut object = config_map("a");
        object.metadata.finalizers = Some(vec!["example.com/finalizer".to_owned()]);
        ObjectStore::<ConfigMap>::create(&store, &object).await.unwrap();

        ObjectStore::<ConfigMap>::delete(&store, "test", "a").await.unwrap();
        let mut marked: ConfigMap = store.fetch("test", "a").unwrap();
        assert!(marked.metadata.deletion_timestamp.is_some());

        marked.metadata.finalizers = None;
        ObjectStore::<ConfigMap>::replace(&store, &marked).await.unwrap();
        assert!(store.fetch::<ConfigMap>("test", "a").is_none());
    }

    #[tokio::test]
    async fn test_removal_collects_dependents() {
        let store = MemoryStore::new();
        let owner = ObjectStore::<ConfigMap>::create(&store, &config_map("owner"))
            .await
            .unwrap();
        let dependent = Secret {
            metadata: ObjectMeta {
                name: Some("dependent".to_owned()),
                namespace: Some("test".to_owned()),
                owner_references: owner.controller_owner_ref(&()).map(|r| vec![r]),
                ..ObjectMeta::default()
            },
            ..Secret::default()
        };
        ObjectStore::<Secret>::create(&store, &dependent).await.unwrap();

        ObjectStore::<ConfigMap>::delete(&store, "test", "owner")
            .await
            .unwrap();
        assert!(store.fetch::<Secret>("test", "dependent").is_none());
        assert_eq!(store.writes(), 3);
    }
}
