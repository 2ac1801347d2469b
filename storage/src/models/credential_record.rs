//! Credential record model for persistence.
//!
//! Maps to the `fanfou_tokens` table: one row per identity, keyed by the numeric
//! identity itself so the key scheme is stable across deployments.

use chrono::{DateTime, Utc};
use relay_core::{Credential, Identity};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub identity: i64,
    pub access_token: String,
    pub access_secret: String,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Builds a row for `identity` stamped with the current time.
    pub fn new(identity: Identity, credential: &Credential) -> Self {
        Self {
            identity: identity.as_i64(),
            access_token: credential.access_token.clone(),
            access_secret: credential.access_secret.clone(),
            updated_at: Utc::now(),
        }
    }

    pub fn into_credential(self) -> Credential {
        Credential {
            access_token: self.access_token,
            access_secret: self.access_secret,
        }
    }
}
