//! # relay-core
//!
//! Core types and traits for the Fanfou relay bot: [`Identity`], [`Credential`],
//! inbound/outbound message variants, the [`Bot`] transport trait, the [`Handler`]
//! trait, the [`RelayError`] taxonomy, and tracing initialization.
//! Transport-agnostic; used by storage, fanfou-client, relay-telegram and fanfou-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod mask;
pub mod types;

pub use bot::Bot;
pub use error::{RelayError, Result};
pub use logger::init_tracing;
pub use mask::mask_token;
pub use types::{
    Credential, Handler, HandlerResponse, Identity, InboundMessage, MessageContent,
    OutboundMessage, RelayOutcome,
};
