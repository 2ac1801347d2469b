//! Browser redirect target that finishes a pending authorization.
//!
//! The query carries everything needed to resume the handshake: `identity` and
//! `request_secret` (plus `sig` when callback signing is on) that `initiate` put into
//! the callback URL, and `oauth_token`/`oauth_verifier` appended by the provider.
//! Every failure is answered with a status code; nothing here can take the process down.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use fanfou_client::{AuthorizationFlow, IDENTITY_PARAM, REQUEST_SECRET_PARAM, SIGNATURE_PARAM};
use relay_core::{mask_token, Bot, Identity, RelayError};
use storage::CredentialStore;
use tracing::{error, info, instrument, warn};

pub const SUCCESS_NOTIFICATION: &str = "Success Authorization";
pub const ACKNOWLEDGEMENT: &str = "it's ok";

const TOKEN_PARAM: &str = "oauth_token";
const VERIFIER_PARAM: &str = "oauth_verifier";

pub struct CallbackHandler {
    flow: Arc<AuthorizationFlow>,
    store: Arc<dyn CredentialStore>,
    bot: Arc<dyn Bot>,
}

type Reply = (StatusCode, String);

fn bad_request(message: impl Into<String>) -> Reply {
    (StatusCode::BAD_REQUEST, message.into())
}

fn required<'a>(query: &'a HashMap<String, String>, name: &str) -> Result<&'a str, Reply> {
    query
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| bad_request(format!("missing {}", name)))
}

impl CallbackHandler {
    pub fn new(
        flow: Arc<AuthorizationFlow>,
        store: Arc<dyn CredentialStore>,
        bot: Arc<dyn Bot>,
    ) -> Self {
        Self { flow, store, bot }
    }

    /// Completes the handshake for the identity in `query` and stores the credential.
    ///
    /// 400 for malformed input, a bad tag or a rejected verifier; 502 when the provider
    /// cannot be reached or answers garbage; 500 when the credential cannot be stored.
    #[instrument(skip(self, query))]
    pub async fn handle(&self, query: &HashMap<String, String>) -> Reply {
        match self.complete(query).await {
            Ok(reply) | Err(reply) => reply,
        }
    }

    async fn complete(&self, query: &HashMap<String, String>) -> Result<Reply, Reply> {
        let identity: Identity = required(query, IDENTITY_PARAM)?
            .parse()
            .map_err(|e: RelayError| bad_request(e.to_string()))?;
        let request_secret = required(query, REQUEST_SECRET_PARAM)?;
        let request_token = required(query, TOKEN_PARAM)?;
        let verifier = required(query, VERIFIER_PARAM)?;

        if let Some(guard) = self.flow.callback_guard() {
            let sig = required(query, SIGNATURE_PARAM)?;
            if !guard.verify(identity, request_secret, sig) {
                warn!(identity = %identity, "Callback signature mismatch");
                return Err(bad_request("invalid callback signature"));
            }
        }

        let credential = self
            .flow
            .complete(identity, request_secret, request_token, verifier)
            .await
            .map_err(|e| match e {
                RelayError::Auth(message) => bad_request(message),
                other => {
                    error!(identity = %identity, error = %other, "Access token exchange failed");
                    (StatusCode::BAD_GATEWAY, other.to_string())
                }
            })?;

        self.store.put(identity, &credential).await.map_err(|e| {
            error!(identity = %identity, error = %e, "Failed to store credential");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to store credential".to_string())
        })?;
        info!(
            identity = %identity,
            access_token = %mask_token(&credential.access_token),
            "Credential stored"
        );

        if let Err(e) = self.bot.send_message(identity, SUCCESS_NOTIFICATION).await {
            warn!(identity = %identity, error = %e, "Authorized but notification failed");
        }
        Ok((StatusCode::OK, ACKNOWLEDGEMENT.to_string()))
    }
}
