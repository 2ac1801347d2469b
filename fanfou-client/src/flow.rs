//! OAuth1 three-legged authorization against the provider.
//!
//! `initiate` fetches a request token and returns the authorize URL. No state is kept
//! server-side: the identity and request secret ride inside the callback URL and come
//! back through the browser redirect. `complete` redeems the verifier for an access
//! credential; the provider enforces that token, secret and verifier belong together
//! and that a verifier is used only once.

use std::sync::Arc;

use relay_core::{mask_token, Credential, Identity, RelayError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{info, instrument, warn};
use url::Url;

use crate::callback_guard::{CallbackGuard, SIGNATURE_PARAM};
use crate::config::ProviderConfig;
use crate::oauth1::{OAuthSigner, TokenRef};
use crate::response::{oauth_rejection_message, parse_token_response, TokenResponse};
use crate::transport_error;

/// Callback query parameter carrying the identity.
pub const IDENTITY_PARAM: &str = "identity";
/// Callback query parameter carrying the request secret.
pub const REQUEST_SECRET_PARAM: &str = "request_secret";

/// Temporary credentials issued by the request-token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
}

impl From<TokenResponse> for RequestToken {
    fn from(r: TokenResponse) -> Self {
        Self {
            token: r.token,
            secret: r.secret,
        }
    }
}

pub struct AuthorizationFlow {
    config: Arc<ProviderConfig>,
    client: Client,
    signer: OAuthSigner,
    guard: Option<CallbackGuard>,
}

impl AuthorizationFlow {
    pub fn new(config: Arc<ProviderConfig>) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self::with_client(config, client))
    }

    /// Uses a caller-provided HTTP client (shared connection pool).
    pub fn with_client(config: Arc<ProviderConfig>, client: Client) -> Self {
        let signer = OAuthSigner::new(&config.consumer_key, &config.consumer_secret);
        let guard = config
            .callback_signing
            .then(|| CallbackGuard::new(config.consumer_secret.as_bytes()));
        Self {
            config,
            client,
            signer,
            guard,
        }
    }

    /// Guard used to tag callback URLs, when signing is enabled.
    pub fn callback_guard(&self) -> Option<&CallbackGuard> {
        self.guard.as_ref()
    }

    /// Requests a fresh request token and returns the provider authorize URL for `identity`.
    #[instrument(skip(self), fields(identity = %identity))]
    pub async fn initiate(&self, identity: Identity) -> Result<String> {
        let request_token = self.request_token().await?;
        let url = self.authorize_url(identity, &request_token);
        info!(request_token = %mask_token(&request_token.token), "Authorization initiated");
        Ok(url)
    }

    async fn request_token(&self) -> Result<RequestToken> {
        let url = &self.config.endpoints.request_token_url;
        let header = self.signer.authorization_header(
            "POST",
            url,
            None,
            &[("oauth_callback", self.config.callback_url.as_str())],
            &[],
        );

        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, header)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Request token rejected");
            return Err(RelayError::ProviderApi {
                status: status.as_u16(),
                message: oauth_rejection_message(status.as_u16(), &body),
            });
        }
        parse_token_response(&body).map(RequestToken::from)
    }

    /// Builds the authorize URL: `oauth_token` plus an `oauth_callback` that carries
    /// `identity`, `request_secret` and, with signing on, `sig`.
    pub fn authorize_url(&self, identity: Identity, request_token: &RequestToken) -> String {
        let mut callback: Url = self.config.callback_url.clone();
        {
            let mut query = callback.query_pairs_mut();
            query
                .append_pair(IDENTITY_PARAM, &identity.to_string())
                .append_pair(REQUEST_SECRET_PARAM, &request_token.secret);
            if let Some(guard) = &self.guard {
                query.append_pair(SIGNATURE_PARAM, &guard.sign(identity, &request_token.secret));
            }
        }

        let mut url = self.config.endpoints.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("oauth_token", &request_token.token)
            .append_pair("oauth_callback", callback.as_str());
        url.into()
    }

    /// Redeems `verifier` for the long-lived access credential.
    ///
    /// Not idempotent: a verifier the provider already consumed yields `Auth`. A 5xx
    /// from the provider is `ProviderApi`, never `Auth`.
    #[instrument(skip(self, request_secret, verifier), fields(identity = %identity))]
    pub async fn complete(
        &self,
        identity: Identity,
        request_secret: &str,
        request_token: &str,
        verifier: &str,
    ) -> Result<Credential> {
        let url = &self.config.endpoints.access_token_url;
        let header = self.signer.authorization_header(
            "POST",
            url,
            Some(TokenRef {
                token: request_token,
                secret: request_secret,
            }),
            &[("oauth_verifier", verifier)],
            &[],
        );

        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, header)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = oauth_rejection_message(status.as_u16(), &body);
            warn!(status = status.as_u16(), message = %message, "Access token exchange rejected");
            if status.is_client_error() {
                return Err(RelayError::Auth(message));
            }
            return Err(RelayError::ProviderApi {
                status: status.as_u16(),
                message,
            });
        }

        let tokens = parse_token_response(&body)?;
        info!(access_token = %mask_token(&tokens.token), "Access token issued");
        Ok(Credential::new(tokens.token, tokens.secret))
    }
}
