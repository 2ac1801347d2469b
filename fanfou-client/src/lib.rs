//! # fanfou-client
//!
//! Fanfou side of the relay: OAuth 1.0a HMAC-SHA1 signing ([`oauth1`]), the
//! three-legged [`AuthorizationFlow`], and the [`RelayDispatcher`] that posts text
//! and photos with a stored credential. Every call is bounded by
//! [`ProviderConfig::timeout`] and never retried.

pub mod callback_guard;
pub mod config;
pub mod flow;
pub mod oauth1;
pub mod relay;
pub mod response;

pub use callback_guard::{CallbackGuard, SIGNATURE_PARAM};
pub use config::{ProviderConfig, ProviderEndpoints};
pub use flow::{AuthorizationFlow, RequestToken, IDENTITY_PARAM, REQUEST_SECRET_PARAM};
pub use oauth1::{OAuthSigner, TokenRef};
pub use relay::{RelayDispatcher, DEFAULT_PHOTO_CAPTION};
pub use response::ErrorEnvelope;

use relay_core::RelayError;

pub(crate) fn transport_error(e: reqwest::Error) -> RelayError {
    if e.is_timeout() {
        RelayError::Transport(format!("request timed out: {}", e))
    } else {
        RelayError::Transport(e.to_string())
    }
}
