//! Process configuration loaded once from the environment (`.env` read by the binary).
//!
//! One value built at startup and handed to each component; there is no global state.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fanfou_client::config::{
    DEFAULT_API_BASE_URL, DEFAULT_OAUTH_BASE_URL, DEFAULT_STATUS_URL_PREFIX,
    DEFAULT_TIMEOUT_SECS as DEFAULT_PROVIDER_TIMEOUT_SECS,
};
use fanfou_client::{ProviderConfig, ProviderEndpoints};
use relay_core::{mask_token, Identity};
use relay_telegram::TelegramConfig;

const DEFAULT_LOG_FILE: &str = "logs/fanfou-relay.log";
const DEFAULT_DATABASE_URL: &str = "sqlite://fanfou_relay.db";
const DEFAULT_TELEGRAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HTTP_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct BotConfig {
    /// BOT_TOKEN, or `--token`
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    pub telegram_timeout: Duration,
    pub log_file: String,
    pub database_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub callback_url: String,
    pub oauth_base_url: String,
    pub api_base_url: String,
    pub status_url_prefix: String,
    pub provider_timeout: Duration,
    /// HMAC-tag identity and request secret in the callback URL.
    pub callback_signing: bool,
    /// Empty means everyone may use the bot.
    pub allowed_users: Vec<Identity>,
    pub http_bind_addr: SocketAddr,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &mask_token(&self.bot_token))
            .field("telegram_api_url", &self.telegram_api_url)
            .field("database_url", &self.database_url)
            .field("consumer_key", &mask_token(&self.consumer_key))
            .field("consumer_secret", &"***")
            .field("callback_url", &self.callback_url)
            .field("oauth_base_url", &self.oauth_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("callback_signing", &self.callback_signing)
            .field("allowed_users", &self.allowed_users.len())
            .field("http_bind_addr", &self.http_bind_addr)
            .finish()
    }
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => bail!("{} not set", name),
    }
}

fn or_default(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn secs(name: &str, default: u64) -> Result<Duration> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            let n: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", name))?;
            Ok(Duration::from_secs(n))
        }
        _ => Ok(Duration::from_secs(default)),
    }
}

fn flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name).ok().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("{} must be true or false, got {:?}", name, v),
        },
    }
}

/// Parses a comma-separated list of identities; blanks are skipped.
pub fn parse_allowed_users(raw: &str) -> Result<Vec<Identity>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Identity>()
                .map_err(|_| anyhow::anyhow!("ALLOWED_USERS contains an invalid id: {:?}", s))
        })
        .collect()
}

impl BotConfig {
    /// Loads from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => required("BOT_TOKEN")?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty());
        let http_bind_addr = or_default("HTTP_BIND_ADDR", DEFAULT_HTTP_BIND_ADDR);

        let config = Self {
            bot_token,
            telegram_api_url,
            telegram_timeout: secs("TELEGRAM_TIMEOUT_SECS", DEFAULT_TELEGRAM_TIMEOUT_SECS)?,
            log_file: or_default("LOG_FILE", DEFAULT_LOG_FILE),
            database_url: or_default("DATABASE_URL", DEFAULT_DATABASE_URL),
            consumer_key: required("FANFOU_CONSUMER_KEY")?,
            consumer_secret: required("FANFOU_CONSUMER_SECRET")?,
            callback_url: required("FANFOU_CALLBACK_URL")?,
            oauth_base_url: or_default("FANFOU_OAUTH_BASE_URL", DEFAULT_OAUTH_BASE_URL),
            api_base_url: or_default("FANFOU_API_BASE_URL", DEFAULT_API_BASE_URL),
            status_url_prefix: or_default("FANFOU_STATUS_URL_PREFIX", DEFAULT_STATUS_URL_PREFIX),
            provider_timeout: secs("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS)?,
            callback_signing: flag("CALLBACK_SIGNING", true)?,
            allowed_users: parse_allowed_users(&env::var("ALLOWED_USERS").unwrap_or_default())?,
            http_bind_addr: http_bind_addr
                .parse()
                .with_context(|| format!("HTTP_BIND_ADDR is not a socket address: {}", http_bind_addr))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every sub-config; any failure is fatal at startup.
    pub fn validate(&self) -> Result<()> {
        self.telegram_config()
            .validate()
            .context("invalid Telegram configuration")?;
        self.provider_config()
            .context("invalid Fanfou configuration")?;
        if self.database_url.trim().is_empty() {
            bail!("DATABASE_URL is empty");
        }
        Ok(())
    }

    pub fn telegram_config(&self) -> TelegramConfig {
        let mut config = TelegramConfig::with_token(self.bot_token.clone());
        config.telegram_api_url = self.telegram_api_url.clone();
        config.request_timeout = self.telegram_timeout;
        config
    }

    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let endpoints = ProviderEndpoints::from_bases(
            &self.oauth_base_url,
            &self.api_base_url,
            &self.status_url_prefix,
        )?;
        let config =
            ProviderConfig::new(&self.consumer_key, &self.consumer_secret, &self.callback_url)?
                .with_endpoints(endpoints)
                .with_timeout(self.provider_timeout)
                .with_callback_signing(self.callback_signing);
        config.validate()?;
        Ok(config)
    }
}
