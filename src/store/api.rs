//! Kubernetes API backed store

use super::{ObjectStore, StoreError};
use crate::constants::OPERATOR_NAME;
use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{DeleteParams, PostParams};
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>,
    {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn post_params() -> PostParams {
    PostParams {
        field_manager: Some(OPERATOR_NAME.to_owned()),
        ..PostParams::default()
    }
}

/// Map API status codes onto store errors
fn api_error<K>(error: kube::Error, namespace: &str, name: &str) -> StoreError
where
    K: Resource<DynamicType = ()>,
{
    let kind = K::kind(&()).to_string();
    let (namespace, name) = (namespace.to_owned(), name.to_owned());
    match error {
        kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound {
            kind,
            namespace,
            name,
        },
        kube::Error::Api(ae) if ae.code == 409 && ae.reason == "AlreadyExists" => {
            StoreError::AlreadyExists {
                kind,
                namespace,
                name,
            }
        }
        kube::Error::Api(ae) if ae.code == 409 => StoreError::Conflict {
            kind,
            namespace,
            name,
        },
        other => StoreError::Kube(other),
    }
}

fn namespace_of<K>(object: &K) -> Result<String, StoreError>
where
    K: Resource<DynamicType = ()>,
{
    object.namespace().ok_or_else(|| StoreError::MissingNamespace {
        kind: K::kind(&()).to_string(),
        name: object.name_any(),
    })
}

#[async_trait]
impl<K> ObjectStore<K> for KubeStore
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Serialize
        + DeserializeOwned
        + Debug
        + Send
        + Sync
        + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError> {
        Ok(self.api::<K>(namespace).get_opt(name).await?)
    }

    async fn create(&self, object: &K) -> Result<K, StoreError> {
        let namespace = namespace_of(object)?;
        self.api::<K>(&namespace)
            .create(&post_params(), object)
            .await
            .map_err(|e| api_error::<K>(e, &namespace, &object.name_any()))
    }

    async fn replace(&self, object: &K) -> Result<K, StoreError> {
        let namespace = namespace_of(object)?;
        let name = object.name_any();
        self.api::<K>(&namespace)
            .replace(&name, &post_params(), object)
            .await
            .map_err(|e| api_error::<K>(e, &namespace, &name))
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        match self
            .api::<K>(namespace)
            .delete(name, &DeleteParams::background())
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(()),
            Err(e) => Err(api_error::<K>(e, namespace, name)),
        }
    }
}
