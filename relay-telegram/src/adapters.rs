//! Adapters from Telegram (teloxide) types to relay_core types.

use relay_core::{Identity, InboundMessage, MessageContent};
use teloxide::types::{Message, User};

/// Wraps a teloxide User; the Telegram user id is the relay identity.
pub struct TelegramUserWrapper<'a>(pub &'a User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn identity(&self) -> Identity {
        Identity(self.0.id.0 as i64)
    }

    pub fn username(&self) -> Option<String> {
        self.0.username.clone()
    }
}

/// Wraps a teloxide Message for conversion to [`InboundMessage`].
pub struct TelegramMessageWrapper<'a>(pub &'a Message);

impl<'a> TelegramMessageWrapper<'a> {
    /// Sender identity: the `from` user, or the chat id for sender-less channel posts.
    pub fn sender(&self) -> Identity {
        self.0
            .from
            .as_ref()
            .map(|u| TelegramUserWrapper(u).identity())
            .unwrap_or(Identity(self.0.chat.id.0))
    }

    pub fn to_inbound(&self) -> InboundMessage {
        let largest_photo = self
            .0
            .photo()
            .and_then(|sizes| sizes.last())
            .map(|p| p.file.id.0.clone());

        InboundMessage {
            id: self.0.id.to_string(),
            sender: self.sender(),
            username: self
                .0
                .from
                .as_ref()
                .and_then(|u| TelegramUserWrapper(u).username()),
            content: classify_content(self.0.text(), largest_photo, self.0.caption()),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Resolves message shape once: text (or command), photo (largest size) or unsupported.
pub fn classify_content(
    text: Option<&str>,
    largest_photo: Option<String>,
    caption: Option<&str>,
) -> MessageContent {
    if let Some(text) = text {
        return MessageContent::from_text(text);
    }
    if let Some(file_ref) = largest_photo {
        return MessageContent::Photo {
            file_ref,
            caption: caption.map(str::to_string),
        };
    }
    MessageContent::Unsupported("other".to_string())
}
