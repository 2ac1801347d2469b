//! Provider configuration: consumer credentials, endpoint URLs, callback URL, timeout.
//!
//! Built once at startup and shared by reference (`Arc`) with the authorization flow
//! and the relay dispatcher.

use std::time::Duration;

use relay_core::{mask_token, RelayError, Result};
use url::Url;

pub const DEFAULT_OAUTH_BASE_URL: &str = "http://fanfou.com";
pub const DEFAULT_API_BASE_URL: &str = "http://api.fanfou.com";
pub const DEFAULT_STATUS_URL_PREFIX: &str = "https://fanfou.com/statuses/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Every URL the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub request_token_url: Url,
    pub authorize_url: Url,
    pub access_token_url: Url,
    pub status_update_url: Url,
    pub photo_upload_url: Url,
    /// Public post URL = prefix + post id.
    pub status_url_prefix: String,
}

impl ProviderEndpoints {
    /// Derives all endpoints from the OAuth host, the API host and the public post prefix.
    pub fn from_bases(oauth_base: &str, api_base: &str, status_url_prefix: &str) -> Result<Self> {
        let oauth_base = oauth_base.trim_end_matches('/');
        let api_base = api_base.trim_end_matches('/');
        Ok(Self {
            request_token_url: parse_url(&format!("{}/oauth/request_token", oauth_base))?,
            authorize_url: parse_url(&format!("{}/oauth/authorize", oauth_base))?,
            access_token_url: parse_url(&format!("{}/oauth/access_token", oauth_base))?,
            status_update_url: parse_url(&format!("{}/statuses/update.json", api_base))?,
            photo_upload_url: parse_url(&format!("{}/photos/upload.json", api_base))?,
            status_url_prefix: status_url_prefix.to_string(),
        })
    }

    /// Production Fanfou endpoints.
    pub fn fanfou() -> Self {
        Self::from_bases(
            DEFAULT_OAUTH_BASE_URL,
            DEFAULT_API_BASE_URL,
            DEFAULT_STATUS_URL_PREFIX,
        )
        .expect("built-in Fanfou URLs are valid")
    }
}

fn parse_url(s: &str) -> Result<Url> {
    Url::parse(s).map_err(|e| RelayError::Config(format!("invalid URL {:?}: {}", s, e)))
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Public URL of the bot's `GET /callback` route.
    pub callback_url: Url,
    pub endpoints: ProviderEndpoints,
    /// Bound on every provider call (connect + transfer).
    pub timeout: Duration,
    /// Tag `identity` + `request_secret` in the callback URL and require the tag back.
    pub callback_signing: bool,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("consumer_key", &mask_token(&self.consumer_key))
            .field("callback_url", &self.callback_url.as_str())
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .field("callback_signing", &self.callback_signing)
            .finish()
    }
}

impl ProviderConfig {
    /// Config against the production Fanfou endpoints with default timeout and signing on.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        callback_url: &str,
    ) -> Result<Self> {
        let config = Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            callback_url: parse_url(callback_url)?,
            endpoints: ProviderEndpoints::fanfou(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            callback_signing: true,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_callback_signing(mut self, enabled: bool) -> Self {
        self.callback_signing = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.consumer_key.trim().is_empty() {
            return Err(RelayError::Config("consumer key is empty".to_string()));
        }
        if self.consumer_secret.trim().is_empty() {
            return Err(RelayError::Config("consumer secret is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(RelayError::Config("provider timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// HTTP client bounded by [`ProviderConfig::timeout`]; cheap to clone and share.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fanfou_endpoints() {
        let e = ProviderEndpoints::fanfou();
        assert_eq!(e.request_token_url.as_str(), "http://fanfou.com/oauth/request_token");
        assert_eq!(e.authorize_url.as_str(), "http://fanfou.com/oauth/authorize");
        assert_eq!(e.access_token_url.as_str(), "http://fanfou.com/oauth/access_token");
        assert_eq!(e.status_update_url.as_str(), "http://api.fanfou.com/statuses/update.json");
        assert_eq!(e.photo_upload_url.as_str(), "http://api.fanfou.com/photos/upload.json");
        assert_eq!(e.status_url_prefix, "https://fanfou.com/statuses/");
    }

    #[test]
    fn test_from_bases_trims_trailing_slash() {
        let e = ProviderEndpoints::from_bases("http://127.0.0.1:1234/", "http://127.0.0.1:1234", "p/").unwrap();
        assert_eq!(e.request_token_url.as_str(), "http://127.0.0.1:1234/oauth/request_token");
        assert_eq!(e.status_update_url.as_str(), "http://127.0.0.1:1234/statuses/update.json");
    }

    #[test]
    fn test_from_bases_rejects_invalid_url() {
        let err = ProviderEndpoints::from_bases("not a url", "http://api", "p").unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn test_new_rejects_missing_consumer() {
        assert!(matches!(
            ProviderConfig::new("", "secret", "https://relay.example/callback"),
            Err(RelayError::Config(_))
        ));
        assert!(matches!(
            ProviderConfig::new("key", " ", "https://relay.example/callback"),
            Err(RelayError::Config(_))
        ));
        assert!(matches!(
            ProviderConfig::new("key", "secret", "/callback"),
            Err(RelayError::Config(_))
        ));
    }

    #[test]
    fn test_debug_masks_consumer_key() {
        let config = ProviderConfig::new("consumer-key-1234567890", "topsecret", "https://relay.example/callback").unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("consumer-key-1234567890"));
        assert!(!printed.contains("topsecret"));
    }
}
