//! Chat transport abstraction.
//!
//! [`Bot`] is transport-agnostic; the Telegram implementation lives in `relay-telegram`.
//! Tests substitute a recording implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Identity;

/// Sends messages to a chat user and fetches files they uploaded.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain text message to the private chat of `identity`.
    async fn send_message(&self, identity: Identity, text: &str) -> Result<()>;
    /// Downloads a file previously uploaded to the transport. `file_ref` is transport-specific.
    async fn fetch_binary(&self, file_ref: &str) -> Result<Vec<u8>>;
}
