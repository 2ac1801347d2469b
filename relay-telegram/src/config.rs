//! Telegram transport config: token, optional API URL, request timeout.

use std::time::Duration;

use relay_core::{mask_token, RelayError, Result};
use reqwest::Url;

/// teloxide's REPL long-polls with a 10 s server-side timeout; the client timeout must exceed it.
const LONG_POLL_SECS: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &mask_token(&self.bot_token))
            .field("telegram_api_url", &self.telegram_api_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl TelegramConfig {
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            return Err(RelayError::Config("BOT_TOKEN is empty".into()));
        }
        if let Some(url) = &self.telegram_api_url {
            Url::parse(url)
                .map_err(|e| RelayError::Config(format!("invalid TELEGRAM_API_URL: {}", e)))?;
        }
        if self.request_timeout <= Duration::from_secs(LONG_POLL_SECS) {
            return Err(RelayError::Config(format!(
                "TELEGRAM_TIMEOUT_SECS must exceed the {} s long-poll",
                LONG_POLL_SECS
            )));
        }
        Ok(())
    }

    /// Builds the teloxide Bot with a bounded HTTP client and the optional API override.
    pub fn build_bot(&self) -> Result<teloxide::Bot> {
        self.validate()?;
        let client = teloxide::net::default_reqwest_settings()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("telegram HTTP client: {}", e)))?;
        let bot = teloxide::Bot::with_client(self.bot_token.clone(), client);
        Ok(match &self.telegram_api_url {
            Some(url) => bot.set_api_url(
                Url::parse(url)
                    .map_err(|e| RelayError::Config(format!("invalid TELEGRAM_API_URL: {}", e)))?,
            ),
            None => bot,
        })
    }
}
