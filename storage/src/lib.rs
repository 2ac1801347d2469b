//! Storage crate: credential persistence keyed by chat identity.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - `models` – CredentialRecord (row of `fanfou_tokens`)
//! - [`credential_store`] – CredentialStore trait
//! - `sqlite_store` – SqliteCredentialStore
//! - `inmemory` – InMemoryCredentialStore
//! - `sqlite_pool` – SqlitePoolManager

pub mod credential_store;
pub mod error;
mod inmemory;
mod models;
mod sqlite_pool;
mod sqlite_store;

pub use credential_store::CredentialStore;
pub use error::StorageError;
pub use inmemory::InMemoryCredentialStore;
pub use models::CredentialRecord;
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_store::SqliteCredentialStore;
