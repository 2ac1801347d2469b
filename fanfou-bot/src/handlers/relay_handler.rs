//! Relays chat messages: `/start` begins authorization, text and photos are posted.
//! Any other command is posted verbatim as text.
//!
//! Every outcome is replied to the sender; errors are rendered with
//! [`RelayError::user_message`](relay_core::RelayError::user_message) and never escape
//! the handler, so one failing message leaves the chain and the process untouched.

use std::sync::Arc;

use async_trait::async_trait;
use fanfou_client::{AuthorizationFlow, RelayDispatcher};
use relay_core::{
    Bot, Handler, HandlerResponse, Identity, InboundMessage, MessageContent, OutboundMessage,
    Result,
};
use tracing::{debug, error, info, instrument, warn};

pub const START_COMMAND: &str = "start";

pub struct RelayHandler {
    flow: Arc<AuthorizationFlow>,
    dispatcher: Arc<RelayDispatcher>,
    bot: Arc<dyn Bot>,
}

impl RelayHandler {
    pub fn new(
        flow: Arc<AuthorizationFlow>,
        dispatcher: Arc<RelayDispatcher>,
        bot: Arc<dyn Bot>,
    ) -> Self {
        Self {
            flow,
            dispatcher,
            bot,
        }
    }

    async fn start(&self, identity: Identity) -> Result<String> {
        let url = self.flow.initiate(identity).await?;
        Ok(format!("Authorization url: {}", url))
    }

    async fn relay_text(&self, identity: Identity, body: &str) -> Result<String> {
        let outcome = self
            .dispatcher
            .relay(
                identity,
                OutboundMessage::Text {
                    body: body.to_string(),
                },
            )
            .await?;
        Ok(outcome.reply_text().to_string())
    }

    async fn relay_photo(
        &self,
        identity: Identity,
        file_ref: &str,
        caption: Option<String>,
    ) -> Result<String> {
        let bytes = self.bot.fetch_binary(file_ref).await?;
        let outcome = self
            .dispatcher
            .relay(identity, OutboundMessage::Photo { bytes, caption })
            .await?;
        Ok(outcome.reply_text().to_string())
    }

    /// Sends `text` to the sender. A failed send is logged only.
    async fn reply(&self, identity: Identity, text: String) -> HandlerResponse {
        if let Err(e) = self.bot.send_message(identity, &text).await {
            error!(identity = %identity, error = %e, "Failed to send reply");
        }
        HandlerResponse::Reply(text)
    }
}

#[async_trait]
impl Handler for RelayHandler {
    #[instrument(skip(self, message), fields(sender = %message.sender))]
    async fn handle(&self, message: &InboundMessage) -> Result<HandlerResponse> {
        let identity = message.sender;
        let result = match &message.content {
            MessageContent::Command { name, .. } if name == START_COMMAND => {
                self.start(identity).await
            }
            MessageContent::Command { name, raw, .. } => {
                debug!(command = %name, "Unknown command, relaying as text");
                self.relay_text(identity, raw).await
            }
            MessageContent::Text(body) => self.relay_text(identity, body).await,
            MessageContent::Photo { file_ref, caption } => {
                self.relay_photo(identity, file_ref, caption.clone()).await
            }
            MessageContent::Unsupported(kind) => {
                debug!(kind = %kind, "Unsupported message, ignoring");
                return Ok(HandlerResponse::Ignore);
            }
        };

        let text = match result {
            Ok(text) => {
                info!(kind = %message.content.kind(), "Message handled");
                text
            }
            Err(e) => {
                warn!(kind = %message.content.kind(), error = %e, "Message failed");
                e.user_message()
            }
        };
        Ok(self.reply(identity, text).await)
    }
}
