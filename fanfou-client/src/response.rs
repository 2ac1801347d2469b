//! Parsing of provider responses: OAuth token bodies, post identifiers, error envelopes.

use relay_core::{RelayError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Error body returned by the content API: `{"request": "...", "error": "..."}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub request: String,
    pub error: String,
}

/// `oauth_token` / `oauth_token_secret` pair from a form-encoded OAuth response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
    pub secret: String,
}

pub fn parse_token_response(body: &str) -> Result<TokenResponse> {
    let mut token = None;
    let mut secret = None;
    for (key, value) in url::form_urlencoded::parse(body.trim().as_bytes()) {
        match key.as_ref() {
            "oauth_token" => token = Some(value.into_owned()),
            "oauth_token_secret" => secret = Some(value.into_owned()),
            _ => {}
        }
    }
    match (token, secret) {
        (Some(token), Some(secret)) if !token.is_empty() && !secret.is_empty() => {
            Ok(TokenResponse { token, secret })
        }
        _ => Err(RelayError::Protocol(
            "token response is missing oauth_token or oauth_token_secret".to_string(),
        )),
    }
}

/// Extracts the post identifier (`id`, string or number) from a success body.
pub fn parse_post_id(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| RelayError::Protocol(format!("success body is not JSON: {}", e)))?;
    match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(RelayError::Protocol(
            "success body has no post id".to_string(),
        )),
    }
}

/// Turns a non-200 content API response into `ProviderApi`, or `Protocol` when the
/// body is not an error envelope.
pub fn api_error(status: u16, body: &str) -> RelayError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => RelayError::ProviderApi {
            status,
            message: envelope.error,
        },
        Err(e) => RelayError::Protocol(format!(
            "unexpected error body (HTTP {}): {}",
            status, e
        )),
    }
}

/// Best-effort human message for a rejected OAuth exchange. The OAuth endpoints
/// answer in plain text, the JSON envelope, or nothing at all.
pub fn oauth_rejection_message(status: u16, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("provider rejected the request (HTTP {})", status)
    } else {
        trimmed.chars().take(200).collect()
    }
}
