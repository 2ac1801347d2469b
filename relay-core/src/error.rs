use thiserror::Error;

use crate::types::Identity;

/// Error taxonomy shared by every component of the relay.
///
/// `Config` is fatal at startup; everything else is caught at the message or
/// request boundary, logged, and turned into a chat reply or HTTP status.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Config error: {0}")]
    Config(String),

    /// Malformed external input: callback query or provider response does not parse.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Provider rejected a token/verifier exchange.
    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("No credential on file for identity {0}")]
    Unauthenticated(Identity),

    /// Provider understood the request but reported a business error.
    #[error("Provider error (HTTP {status}): {message}")]
    ProviderApi { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    /// Network failure (including timeouts) reaching the provider or chat transport.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl RelayError {
    /// Text shown to the chat user for this error.
    pub fn user_message(&self) -> String {
        match self {
            RelayError::Unauthenticated(_) => {
                "You have not authorized Fanfou yet. Send /start to get an authorization link."
                    .to_string()
            }
            RelayError::ProviderApi { message, .. } => message.clone(),
            RelayError::Auth(message) => message.clone(),
            RelayError::Transport(_) => "Fanfou is unreachable right now, please try again later.".to_string(),
            RelayError::Config(_) | RelayError::Protocol(_) | RelayError::Storage(_) => {
                format!("Something went wrong: {}", self)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
