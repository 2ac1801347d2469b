//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1).
//!
//! Only the `Authorization: OAuth ...` header form is produced. Query parameters of
//! the target URL and `application/x-www-form-urlencoded` body parameters take part
//! in the signature; multipart bodies do not.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay literal; everything else is `%XX`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// A token/secret pair used as the second half of the signing key.
#[derive(Debug, Clone, Copy)]
pub struct TokenRef<'a> {
    pub token: &'a str,
    pub secret: &'a str,
}

/// Signs requests on behalf of one OAuth consumer.
#[derive(Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
}

impl OAuthSigner {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
        }
    }

    /// Builds the `Authorization` header value for one request with a fresh nonce and timestamp.
    ///
    /// `oauth_extra` carries protocol parameters such as `oauth_callback` or
    /// `oauth_verifier`; `form` is the url-encoded body, if any.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &Url,
        token: Option<TokenRef<'_>>,
        oauth_extra: &[(&str, &str)],
        form: &[(&str, &str)],
    ) -> String {
        let nonce = generate_nonce();
        let timestamp = chrono::Utc::now().timestamp();
        self.authorization_header_with(method, url, token, oauth_extra, form, &nonce, timestamp)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn authorization_header_with(
        &self,
        method: &str,
        url: &Url,
        token: Option<TokenRef<'_>>,
        oauth_extra: &[(&str, &str)],
        form: &[(&str, &str)],
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let mut oauth: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer_key.clone()),
            ("oauth_nonce".into(), nonce.to_string()),
            ("oauth_signature_method".into(), "HMAC-SHA1".into()),
            ("oauth_timestamp".into(), timestamp.to_string()),
            ("oauth_version".into(), "1.0".into()),
        ];
        if let Some(t) = token {
            oauth.push(("oauth_token".into(), t.token.to_string()));
        }
        oauth.extend(
            oauth_extra
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        let mut params = oauth.clone();
        params.extend(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));
        params.extend(form.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let base = signature_base_string(method, url, &params);
        let signature = hmac_sha1_signature(
            &base,
            &self.consumer_secret,
            token.map(|t| t.secret).unwrap_or(""),
        );
        oauth.push(("oauth_signature".into(), signature));

        let fields: Vec<String> = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }
}

/// `METHOD&enc(base-uri)&enc(normalized-params)` per RFC 5849 section 3.4.1.
pub fn signature_base_string(method: &str, url: &Url, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&base_string_uri(url)),
        percent_encode(&normalized)
    )
}

/// Scheme, host, non-default port and path; no query or fragment.
fn base_string_uri(url: &Url) -> String {
    let mut out = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        out.push_str(&format!(":{}", port));
    }
    out.push_str(url.path());
    out
}

pub fn hmac_sha1_signature(base: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(base.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
