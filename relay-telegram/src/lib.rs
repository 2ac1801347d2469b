//! # relay-telegram
//!
//! Telegram side of the relay: adapters from teloxide messages to
//! [`relay_core::InboundMessage`], the [`relay_core::Bot`] implementation (send text,
//! download files), transport config and the REPL runner. No OAuth or storage logic.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{classify_content, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::run_repl;
