//! Stateful fake of the provider's OAuth and status endpoints, served by axum on a random port.
//!
//! Issues numbered request tokens with a matching verifier, consumes each verifier at
//! most once, and answers status updates with a fixed id. Every route can be delayed
//! to exercise client timeouts.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use percent_encoding::percent_decode_str;

#[derive(Default)]
struct FakeState {
    counter: AtomicUsize,
    hits: AtomicUsize,
    /// request token -> (request secret, verifier)
    issued: Mutex<HashMap<String, (String, String)>>,
    consumed: Mutex<HashSet<String>>,
    delay: Mutex<Duration>,
}

pub struct FakeProvider {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeProvider {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/oauth/request_token", post(request_token))
            .route("/oauth/access_token", post(access_token))
            .route("/statuses/update.json", post(status_update))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// Verifier the provider would show the user for `request_token`.
    pub fn verifier_for(&self, request_token: &str) -> String {
        self.state.issued.lock().unwrap()[request_token].1.clone()
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

fn oauth_params(headers: &HeaderMap) -> HashMap<String, String> {
    let raw = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    raw.trim_start_matches("OAuth ")
        .split(", ")
        .filter_map(|field| field.split_once('='))
        .map(|(k, v)| {
            let v = v.trim_matches('"');
            (
                k.to_string(),
                percent_decode_str(v).decode_utf8_lossy().into_owned(),
            )
        })
        .collect()
}

async fn pause(state: &FakeState) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

async fn request_token(State(state): State<Arc<FakeState>>) -> (StatusCode, String) {
    pause(&state).await;
    let n = state.counter.fetch_add(1, Ordering::SeqCst);
    let token = format!("rt-{}", n);
    let secret = format!("rs-{}", n);
    state
        .issued
        .lock()
        .unwrap()
        .insert(token.clone(), (secret.clone(), format!("verifier-{}", n)));
    (
        StatusCode::OK,
        format!("oauth_token={}&oauth_token_secret={}", token, secret),
    )
}

async fn access_token(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    pause(&state).await;
    let params = oauth_params(&headers);
    let token = params.get("oauth_token").cloned().unwrap_or_default();
    let verifier = params.get("oauth_verifier").cloned().unwrap_or_default();

    let matches = state
        .issued
        .lock()
        .unwrap()
        .get(&token)
        .map(|(_, expected)| *expected == verifier)
        .unwrap_or(false);
    if !matches {
        return (StatusCode::UNAUTHORIZED, "Invalid verifier".to_string());
    }
    if !state.consumed.lock().unwrap().insert(verifier) {
        return (StatusCode::UNAUTHORIZED, "Verifier already used".to_string());
    }
    (
        StatusCode::OK,
        format!("oauth_token=at-{}&oauth_token_secret=as-{}", token, token),
    )
}

async fn status_update(State(state): State<Arc<FakeState>>) -> (StatusCode, String) {
    pause(&state).await;
    (StatusCode::OK, r#"{"id":"42"}"#.to_string())
}
