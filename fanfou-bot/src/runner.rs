//! Startup and supervision: build every component from [`BotConfig`], then run the
//! Telegram REPL and the callback server as two supervised tasks.

use std::sync::Arc;

use anyhow::{Context, Result};
use fanfou_client::{AuthorizationFlow, RelayDispatcher};
use handler_chain::HandlerChain;
use relay_core::{init_tracing, Bot};
use relay_telegram::{run_repl, TelegramBotAdapter};
use storage::{CredentialStore, SqliteCredentialStore};
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

use crate::callback::CallbackHandler;
use crate::config::BotConfig;
use crate::handlers::{AllowlistHandler, LoggingHandler, RelayHandler};
use crate::server;

/// Components shared by the chat side and the HTTP side.
#[derive(Clone)]
pub struct Components {
    pub flow: Arc<AuthorizationFlow>,
    pub dispatcher: Arc<RelayDispatcher>,
    pub store: Arc<dyn CredentialStore>,
    pub bot: Arc<dyn Bot>,
}

impl Components {
    /// Wires flow and dispatcher over one provider HTTP client.
    pub fn build(
        config: &BotConfig,
        store: Arc<dyn CredentialStore>,
        bot: Arc<dyn Bot>,
    ) -> Result<Self> {
        let provider = Arc::new(config.provider_config()?);
        let client = provider.http_client()?;
        Ok(Self {
            flow: Arc::new(AuthorizationFlow::with_client(provider.clone(), client.clone())),
            dispatcher: Arc::new(RelayDispatcher::with_client(provider, store.clone(), client)),
            store,
            bot,
        })
    }
}

/// Logging, optional allowlist, then the relay handler.
pub fn build_handler_chain(config: &BotConfig, components: &Components) -> HandlerChain {
    let mut chain = HandlerChain::new().add_handler(Arc::new(LoggingHandler));
    if !config.allowed_users.is_empty() {
        chain = chain.add_handler(Arc::new(AllowlistHandler::new(config.allowed_users.clone())));
    }
    chain.add_handler(Arc::new(RelayHandler::new(
        components.flow.clone(),
        components.dispatcher.clone(),
        components.bot.clone(),
    )))
}

pub fn build_callback_handler(components: &Components) -> Arc<CallbackHandler> {
    Arc::new(CallbackHandler::new(
        components.flow.clone(),
        components.store.clone(),
        components.bot.clone(),
    ))
}

/// Main entry: logging, storage, components, then REPL and HTTP server until either exits.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    init_tracing(&config.log_file)?;
    info!(config = ?config, "Starting fanfou relay");

    let store: Arc<dyn CredentialStore> = Arc::new(
        SqliteCredentialStore::new(&config.database_url)
            .await
            .with_context(|| format!("Failed to open credential store {}", config.database_url))?,
    );
    let teloxide_bot = config.telegram_config().build_bot()?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let components = Components::build(&config, store, bot)?;
    let chain = build_handler_chain(&config, &components);
    let app = server::router(build_callback_handler(&components));

    let mut tasks: JoinSet<(&'static str, Result<()>)> = JoinSet::new();
    tasks.spawn(async move {
        ("telegram", run_repl(teloxide_bot, chain).await.map_err(Into::into))
    });
    let addr = config.http_bind_addr;
    tasks.spawn(async move { ("http", server::serve(addr, app).await) });

    let first = tasks.join_next().await;
    tasks.abort_all();
    match first {
        Some(Ok((name, Ok(())))) => {
            info!(task = name, "Task finished, shutting down");
            Ok(())
        }
        Some(Ok((name, Err(e)))) => {
            error!(task = name, error = %e, "Task failed, shutting down");
            Err(e.context(format!("{} task failed", name)))
        }
        Some(Err(join_error)) => {
            error!(error = %join_error, "Task panicked, shutting down");
            Err(join_error.into())
        }
        None => Ok(()),
    }
}
