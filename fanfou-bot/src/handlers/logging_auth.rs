//! Handlers for logging and the optional allowlist.

use async_trait::async_trait;
use relay_core::{Handler, HandlerResponse, Identity, InboundMessage, Result};
use tracing::{debug, info, instrument, warn};

/// Logs each message in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &InboundMessage) -> Result<bool> {
        info!(
            sender = %message.sender,
            username = %message.username.as_deref().unwrap_or("unknown"),
            kind = %message.content.kind(),
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &InboundMessage, response: &HandlerResponse) -> Result<()> {
        let reply_len = match response {
            HandlerResponse::Reply(text) => Some(text.len()),
            _ => None,
        };
        debug!(message_id = %message.id, reply_len = ?reply_len, "Processed message");
        Ok(())
    }
}

/// Stops the chain silently when the sender is not in the allowlist.
pub struct AllowlistHandler {
    allowed_users: Vec<Identity>,
}

impl AllowlistHandler {
    pub fn new(allowed_users: Vec<Identity>) -> Self {
        Self { allowed_users }
    }
}

#[async_trait]
impl Handler for AllowlistHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &InboundMessage) -> Result<bool> {
        if self.allowed_users.contains(&message.sender) {
            Ok(true)
        } else {
            warn!(sender = %message.sender, "Sender not in allowlist, ignoring");
            Ok(false)
        }
    }
}
