//! Shared helpers for fanfou-client integration tests.
#![allow(dead_code)]

pub mod fake_provider;

use fanfou_client::{ProviderConfig, ProviderEndpoints};

pub const CONSUMER_KEY: &str = "test-consumer-key";
pub const CONSUMER_SECRET: &str = "test-consumer-secret";
pub const CALLBACK_URL: &str = "https://relay.example/callback";
pub const STATUS_PREFIX: &str = "https://fanfou.com/statuses/";

/// Provider config whose OAuth and API endpoints all point at `base_url`.
pub fn config_for(base_url: &str) -> ProviderConfig {
    ProviderConfig::new(CONSUMER_KEY, CONSUMER_SECRET, CALLBACK_URL)
        .expect("valid test config")
        .with_endpoints(
            ProviderEndpoints::from_bases(base_url, base_url, STATUS_PREFIX)
                .expect("valid test endpoints"),
        )
}

/// Splits an authorize URL into (oauth_token, callback identity, request_secret, sig).
pub fn parse_authorize_url(url: &str) -> (String, String, String, Option<String>) {
    let url = url::Url::parse(url).expect("authorize URL parses");
    let param = |u: &url::Url, name: &str| {
        u.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    let token = param(&url, "oauth_token").expect("oauth_token present");
    let callback = url::Url::parse(&param(&url, "oauth_callback").expect("oauth_callback present"))
        .expect("callback parses");
    (
        token,
        param(&callback, "identity").expect("identity present"),
        param(&callback, "request_secret").expect("request_secret present"),
        param(&callback, "sig"),
    )
}
