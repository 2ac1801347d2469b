//! In-memory credential store for tests and local development. Data is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use relay_core::{Credential, Identity};
use tokio::sync::RwLock;

use crate::credential_store::CredentialStore;
use crate::error::StorageError;

/// The lock is held only for the map operation itself, never across I/O.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    entries: Arc<RwLock<HashMap<Identity, Credential>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, identity: Identity) -> Result<Option<Credential>, StorageError> {
        Ok(self.entries.read().await.get(&identity).cloned())
    }

    async fn put(&self, identity: Identity, credential: &Credential) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(identity, credential.clone());
        Ok(())
    }
}
