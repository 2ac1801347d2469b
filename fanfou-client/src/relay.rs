//! Signed posting of chat content to the content API.

use std::sync::Arc;

use relay_core::{Credential, Identity, OutboundMessage, RelayError, RelayOutcome, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use storage::CredentialStore;
use tracing::{info, instrument, warn};

use crate::config::ProviderConfig;
use crate::oauth1::{OAuthSigner, TokenRef};
use crate::response::{api_error, parse_post_id};
use crate::transport_error;

/// Status text used when a photo arrives without a caption.
pub const DEFAULT_PHOTO_CAPTION: &str = "Just posted a photo";

const PHOTO_FILE_NAME: &str = "photo.jpg";
const PHOTO_MIME: &str = "image/jpeg";

pub struct RelayDispatcher {
    config: Arc<ProviderConfig>,
    client: Client,
    signer: OAuthSigner,
    store: Arc<dyn CredentialStore>,
}

impl RelayDispatcher {
    pub fn new(config: Arc<ProviderConfig>, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self::with_client(config, store, client))
    }

    pub fn with_client(
        config: Arc<ProviderConfig>,
        store: Arc<dyn CredentialStore>,
        client: Client,
    ) -> Self {
        let signer = OAuthSigner::new(&config.consumer_key, &config.consumer_secret);
        Self {
            config,
            client,
            signer,
            store,
        }
    }

    /// Posts `message` on behalf of `identity`.
    pub async fn relay(&self, identity: Identity, message: OutboundMessage) -> Result<RelayOutcome> {
        match message {
            OutboundMessage::Text { body } => self.post_text(identity, &body).await,
            OutboundMessage::Photo { bytes, caption } => {
                self.post_photo(identity, bytes, caption.as_deref()).await
            }
        }
    }

    /// Stored credential for `identity`; `Unauthenticated` before any network activity when absent.
    async fn credential(&self, identity: Identity) -> Result<Credential> {
        self.store
            .get(identity)
            .await?
            .ok_or(RelayError::Unauthenticated(identity))
    }

    /// Form-encoded `status` update. Success yields the canonical post URL.
    #[instrument(skip(self, text), fields(identity = %identity, len = text.len()))]
    pub async fn post_text(&self, identity: Identity, text: &str) -> Result<RelayOutcome> {
        let credential = self.credential(identity).await?;
        let url = &self.config.endpoints.status_update_url;
        let form = [("status", text)];
        let header = self.signer.authorization_header(
            "POST",
            url,
            Some(token_of(&credential)),
            &[],
            &form,
        );

        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, header)
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Status update failed");
            return Err(api_error(status.as_u16(), &body));
        }

        let id = parse_post_id(&body)?;
        let url = format!("{}{}", self.config.endpoints.status_url_prefix, id);
        info!(post_url = %url, "Status posted");
        Ok(RelayOutcome::Posted { url })
    }

    /// Multipart upload with `status` (caption or [`DEFAULT_PHOTO_CAPTION`]) and `photo` fields.
    ///
    /// Multipart fields are not part of the OAuth signature. Success yields the post URL
    /// when the body carries an id, otherwise the raw body.
    #[instrument(skip(self, image, caption), fields(identity = %identity, size = image.len()))]
    pub async fn post_photo(
        &self,
        identity: Identity,
        image: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<RelayOutcome> {
        let credential = self.credential(identity).await?;
        let url = &self.config.endpoints.photo_upload_url;
        let caption = caption
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_PHOTO_CAPTION);

        let photo = Part::bytes(image)
            .file_name(PHOTO_FILE_NAME)
            .mime_str(PHOTO_MIME)
            .map_err(|e| RelayError::Protocol(e.to_string()))?;
        let form = Form::new().text("status", caption.to_string()).part("photo", photo);

        let header =
            self.signer
                .authorization_header("POST", url, Some(token_of(&credential)), &[], &[]);

        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, header)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Photo upload failed");
            return Err(api_error(status.as_u16(), &body));
        }

        match parse_post_id(&body) {
            Ok(id) => {
                let url = format!("{}{}", self.config.endpoints.status_url_prefix, id);
                info!(post_url = %url, "Photo posted");
                Ok(RelayOutcome::Posted { url })
            }
            Err(_) => {
                info!("Photo posted, response has no id");
                Ok(RelayOutcome::Accepted { body })
            }
        }
    }
}

fn token_of(credential: &Credential) -> TokenRef<'_> {
    TokenRef {
        token: &credential.access_token,
        secret: &credential.access_secret,
    }
}
