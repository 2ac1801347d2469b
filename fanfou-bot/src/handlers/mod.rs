//! Chat handlers: logging, optional allowlist, and the relay itself.

mod logging_auth;
mod relay_handler;

pub use logging_auth::{AllowlistHandler, LoggingHandler};
pub use relay_handler::{RelayHandler, START_COMMAND};
