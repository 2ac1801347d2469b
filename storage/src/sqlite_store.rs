//! SQLite-backed credential store.
//!
//! Uses SqlitePoolManager and [`CredentialRecord`]. Each `put` is one
//! `INSERT ... ON CONFLICT DO UPDATE` statement, so a write for one identity is
//! atomic and never merges with the previous row.

use async_trait::async_trait;
use relay_core::{Credential, Identity};
use tracing::{debug, info, instrument};

use crate::credential_store::CredentialStore;
use crate::error::StorageError;
use crate::models::CredentialRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteCredentialStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating credential table if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fanfou_tokens (
                identity INTEGER PRIMARY KEY,
                access_token TEXT NOT NULL,
                access_secret TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(self.pool_manager.pool())
        .await?;

        Ok(())
    }

    /// Number of identities with a credential on file.
    pub async fn count(&self) -> Result<i64, StorageError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fanfou_tokens")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(row.0)
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    #[instrument(skip(self), fields(identity = %identity))]
    async fn get(&self, identity: Identity) -> Result<Option<Credential>, StorageError> {
        let record: Option<CredentialRecord> = sqlx::query_as(
            "SELECT identity, access_token, access_secret, updated_at FROM fanfou_tokens WHERE identity = ?",
        )
        .bind(identity.as_i64())
        .fetch_optional(self.pool_manager.pool())
        .await?;

        match record {
            Some(r) if r.access_token.is_empty() || r.access_secret.is_empty() => {
                Err(StorageError::Corrupt(identity.to_string()))
            }
            Some(r) => {
                debug!(updated_at = %r.updated_at, "Credential found");
                Ok(Some(r.into_credential()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, credential), fields(identity = %identity))]
    async fn put(&self, identity: Identity, credential: &Credential) -> Result<(), StorageError> {
        let record = CredentialRecord::new(identity, credential);

        sqlx::query(
            r#"
            INSERT INTO fanfou_tokens (identity, access_token, access_secret, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(identity) DO UPDATE SET
                access_token = excluded.access_token,
                access_secret = excluded.access_secret,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.identity)
        .bind(&record.access_token)
        .bind(&record.access_secret)
        .bind(record.updated_at)
        .execute(self.pool_manager.pool())
        .await?;

        info!("Saved credential");
        Ok(())
    }
}
