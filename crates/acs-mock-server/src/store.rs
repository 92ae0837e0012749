//! In-memory HEC token store
//!
//! Tokens are keyed by `(instance, name)` so a single mock server can stand in
//! for several Splunk stacks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Token definition as sent by clients and echoed back by ACS
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_index: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_indexes: Vec<String>,
}

/// A stored token: its definition plus the generated value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub spec: TokenSpec,
    pub token: String,
}

/// Thread-safe token store shared between handlers
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: Arc<RwLock<HashMap<(String, String), StoredToken>>>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new token, returning `None` if one with the same name exists
    pub async fn insert(&self, instance: &str, spec: TokenSpec) -> Option<StoredToken> {
        let mut tokens = self.tokens.write().await;
        let key = (instance.to_owned(), spec.name.clone());
        if tokens.contains_key(&key) {
            return None;
        }
        let stored = StoredToken {
            spec,
            token: uuid::Uuid::new_v4().to_string(),
        };
        tokens.insert(key, stored.clone());
        Some(stored)
    }

    pub async fn get(&self, instance: &str, name: &str) -> Option<StoredToken> {
        self.tokens
            .read()
            .await
            .get(&(instance.to_owned(), name.to_owned()))
            .cloned()
    }

    /// Remove a token, returning whether it existed
    pub async fn remove(&self, instance: &str, name: &str) -> bool {
        self.tokens
            .write()
            .await
            .remove(&(instance.to_owned(), name.to_owned()))
            .is_some()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
