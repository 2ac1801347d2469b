//! Core types: identity, credential, inbound and outbound messages, handler trait.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RelayError;
use crate::mask::mask_token;

/// Stable identifier of a chat-side user (the Telegram user id).
///
/// Used as the only correlation key between `/start`, the browser callback and the
/// credential store. The decimal form is what travels in the callback URL and what
/// keys the persisted record, so it must never change shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub i64);

impl Identity {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identity {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Identity)
            .map_err(|_| RelayError::Protocol(format!("invalid identity: {:?}", s)))
    }
}

/// Long-lived OAuth1 access token/secret pair for one identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub access_secret: String,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, access_secret: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            access_secret: access_secret.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &mask_token(&self.access_token))
            .field("access_secret", &"***")
            .finish()
    }
}

/// Content relayed to the provider.
#[derive(Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text { body: String },
    Photo { bytes: Vec<u8>, caption: Option<String> },
}

impl fmt::Debug for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundMessage::Text { body } => f.debug_struct("Text").field("body", body).finish(),
            OutboundMessage::Photo { bytes, caption } => f
                .debug_struct("Photo")
                .field("len", &bytes.len())
                .field("caption", caption)
                .finish(),
        }
    }
}

/// Successful relay result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The provider returned a post identifier; `url` is the canonical public link.
    Posted { url: String },
    /// The provider accepted the post but returned no identifier; raw response body.
    Accepted { body: String },
}

impl RelayOutcome {
    /// Text sent back to the chat user.
    pub fn reply_text(&self) -> &str {
        match self {
            RelayOutcome::Posted { url } => url,
            RelayOutcome::Accepted { body } => body,
        }
    }
}

/// Shape of an inbound chat message, resolved once at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// `/name args`; `name` is lowercase without the slash or `@botname` suffix.
    /// `mention` is that suffix, `raw` the untouched message text.
    Command {
        name: String,
        args: String,
        mention: Option<String>,
        raw: String,
    },
    Text(String),
    /// `file_ref` is transport-specific (Telegram file id of the largest size).
    Photo {
        file_ref: String,
        caption: Option<String>,
    },
    /// Anything else (stickers, voice, ...); carries a short kind label for logs.
    Unsupported(String),
}

impl MessageContent {
    /// Parses message text into `Command` when it starts with `/`, otherwise `Text`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return MessageContent::Text(text.to_string());
        };
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (rest, ""),
        };
        let (name, mention) = match head.split_once('@') {
            Some((name, mention)) => (name, Some(mention.to_string())),
            None => (head, None),
        };
        if name.is_empty() {
            return MessageContent::Text(text.to_string());
        }
        MessageContent::Command {
            name: name.to_lowercase(),
            args: args.to_string(),
            mention,
            raw: text.to_string(),
        }
    }

    /// False only for a command whose `@mention` names a bot other than `bot_username`.
    /// With no known username every message counts as addressed to us.
    pub fn is_addressed_to(&self, bot_username: Option<&str>) -> bool {
        match (self, bot_username) {
            (
                MessageContent::Command {
                    mention: Some(mention),
                    ..
                },
                Some(me),
            ) => mention.eq_ignore_ascii_case(me),
            _ => true,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            MessageContent::Command { .. } => "command",
            MessageContent::Text(_) => "text",
            MessageContent::Photo { .. } => "photo",
            MessageContent::Unsupported(kind) => kind,
        }
    }
}

/// A single inbound chat message.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub sender: Identity,
    pub username: Option<String>,
    pub content: MessageContent,
    pub created_at: DateTime<Utc>,
}

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; no response body.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain and attach the reply that was sent to the user.
    Reply(String),
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Reply → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _message: &InboundMessage) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the message. Return Stop or Reply to end the handle phase. Default: Continue.
    async fn handle(&self, _message: &InboundMessage) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _message: &InboundMessage,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
