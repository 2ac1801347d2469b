//! Wraps teloxide::Bot and implements [`relay_core::Bot`]. Tests substitute a recording Bot.

use async_trait::async_trait;
use relay_core::{Bot as CoreBot, Identity, RelayError, Result};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{ChatId, FileId};
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements relay-core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

fn transport(e: impl std::fmt::Display) -> RelayError {
    RelayError::Transport(format!("telegram: {}", e))
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, identity: Identity, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(identity.as_i64()), text.to_string())
            .await
            .map_err(transport)?;
        Ok(())
    }

    /// Resolves the file path with `getFile`, then downloads the content into memory.
    async fn fetch_binary(&self, file_ref: &str) -> Result<Vec<u8>> {
        let file = self
            .bot
            .get_file(FileId(file_ref.to_string()))
            .await
            .map_err(transport)?;
        let mut buf = Vec::new();
        self.bot
            .download_file(&file.path, &mut buf)
            .await
            .map_err(transport)?;
        debug!(size = buf.len(), "Downloaded file");
        Ok(buf)
    }
}
