//! # fanfou-bot
//!
//! Telegram bot that authorizes users against Fanfou (OAuth1 three-legged) and relays
//! their text and photo messages as Fanfou posts.
//!
//! - [`config`]: [`BotConfig`] from env
//! - [`handlers`]: logging, allowlist, [`RelayHandler`]
//! - [`callback`]: [`CallbackHandler`] for the provider redirect
//! - [`server`]: axum router for `/`, `/health`, `/callback`
//! - [`runner`]: wiring and supervision of the REPL and the server

pub mod callback;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod runner;
pub mod server;

pub use callback::{CallbackHandler, ACKNOWLEDGEMENT, SUCCESS_NOTIFICATION};
pub use config::BotConfig;
pub use handlers::{AllowlistHandler, LoggingHandler, RelayHandler};
pub use runner::{build_callback_handler, build_handler_chain, run_bot, Components};
