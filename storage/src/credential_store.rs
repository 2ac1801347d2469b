use async_trait::async_trait;
use relay_core::{Credential, Identity};

use crate::error::StorageError;

/// Durable identity → credential persistence.
///
/// Implementations must be safe for concurrent use across identities, and a `put`
/// for one identity must never be observable half-written by a `get` for the same
/// identity. Each key is independent; there is no cross-key locking.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the credential for `identity`, or `None` when nothing is on file.
    async fn get(&self, identity: Identity) -> Result<Option<Credential>, StorageError>;

    /// Stores `credential` for `identity`, replacing any previous value (no merge, no history).
    async fn put(&self, identity: Identity, credential: &Credential) -> Result<(), StorageError>;
}
