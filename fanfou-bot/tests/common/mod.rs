//! Shared helpers for fanfou-bot integration tests.
#![allow(dead_code)]

pub mod mock_bot;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fanfou_bot::{BotConfig, Components};
use fanfou_client::CallbackGuard;
use relay_core::{Identity, InboundMessage, MessageContent};
use storage::InMemoryCredentialStore;

use mock_bot::MockBot;

pub const CONSUMER_SECRET: &str = "test-consumer-secret";

/// Config whose OAuth and API hosts both point at `base_url` (a mockito server).
pub fn test_config(base_url: &str, callback_signing: bool) -> BotConfig {
    BotConfig {
        bot_token: "123456:TEST".to_string(),
        telegram_api_url: None,
        telegram_timeout: Duration::from_secs(30),
        log_file: "logs/test.log".to_string(),
        database_url: "sqlite::memory:".to_string(),
        consumer_key: "test-consumer-key".to_string(),
        consumer_secret: CONSUMER_SECRET.to_string(),
        callback_url: "https://relay.example/callback".to_string(),
        oauth_base_url: base_url.to_string(),
        api_base_url: base_url.to_string(),
        status_url_prefix: "https://fanfou.com/statuses/".to_string(),
        provider_timeout: Duration::from_secs(5),
        callback_signing,
        allowed_users: vec![],
        http_bind_addr: "127.0.0.1:0".parse().unwrap(),
    }
}

pub struct Harness {
    pub config: BotConfig,
    pub components: Components,
    pub store: Arc<InMemoryCredentialStore>,
    pub bot: Arc<MockBot>,
}

pub fn harness(base_url: &str, callback_signing: bool) -> Harness {
    let config = test_config(base_url, callback_signing);
    let store = Arc::new(InMemoryCredentialStore::default());
    let bot = Arc::new(MockBot::default());
    let components = Components::build(&config, store.clone(), bot.clone()).unwrap();
    Harness {
        config,
        components,
        store,
        bot,
    }
}

pub fn sig(identity: Identity, request_secret: &str) -> String {
    CallbackGuard::new(CONSUMER_SECRET).sign(identity, request_secret)
}

pub fn inbound(sender: i64, content: MessageContent) -> InboundMessage {
    InboundMessage {
        id: "1".to_string(),
        sender: Identity(sender),
        username: Some("tester".to_string()),
        content,
        created_at: Utc::now(),
    }
}
