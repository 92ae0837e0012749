//! # Token Secret
//!
//! Renders a HEC token into the Splunk universal forwarder `outputs.conf`
//! stored in the `splunk-hec-token` Secret.

use super::ReconcileError;
use crate::constants::{OPERATOR_NAME, SECRET_DATA_KEY, TOKEN_SECRET_NAME};
use crate::crd::SplunkToken;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;
use zeroize::Zeroizing;

/// Forwarder configuration sending events to `collector_uri` with `token_value`
#[must_use]
pub fn outputs_conf(token_value: &str, collector_uri: &str) -> Zeroizing<String> {
    Zeroizing::new(format!(
        "[httpout]\nhttpEventCollectorToken = {token_value}\nuri = {collector_uri}"
    ))
}

/// Immutable Secret holding the forwarder configuration, controlled by `owner`
pub fn token_secret(
    owner: &SplunkToken,
    token_value: &str,
    collector_uri: &str,
) -> Result<Secret, ReconcileError> {
    let namespace = owner.namespace().ok_or(ReconcileError::MissingMetadata {
        kind: "SplunkToken",
        field: "namespace",
    })?;
    let owner_reference = owner
        .controller_owner_ref(&())
        .ok_or(ReconcileError::MissingMetadata {
            kind: "SplunkToken",
            field: "uid",
        })?;
    let payload = outputs_conf(token_value, collector_uri);

    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(TOKEN_SECRET_NAME.to_owned()),
            namespace: Some(namespace),
            labels: Some(BTreeMap::from([(
                "app.kubernetes.io/managed-by".to_owned(),
                OPERATOR_NAME.to_owned(),
            )])),
            owner_references: Some(vec![owner_reference]),
            ..ObjectMeta::default()
        },
        immutable: Some(true),
        type_: Some("Opaque".to_owned()),
        data: Some(BTreeMap::from([(
            SECRET_DATA_KEY.to_owned(),
            ByteString(payload.as_bytes().to_vec()),
        )])),
        ..Secret::default()
    })
}

/// UID of the object controlling `secret`, if any
pub(crate) fn controller_uid(secret: &Secret) -> Option<&str> {
    secret
        .owner_references()
        .iter()
        .find(|r| r.controller == Some(true))
        .map(|r| r.uid.as_str())
}
