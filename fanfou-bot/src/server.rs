//! HTTP surface: welcome, health and the OAuth callback.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::callback::CallbackHandler;

/// `/`, `/health` (and the legacy `/_ah/health`), `/callback`. Request tracing is on;
/// a panic inside a handler becomes a 500 for that request only.
pub fn router(callback: Arc<CallbackHandler>) -> Router {
    Router::new()
        .route("/", get(|| async { "welcome" }))
        .route("/health", get(|| async { "ok" }))
        .route("/_ah/health", get(|| async { "ok" }))
        .route("/callback", get(callback_route))
        .with_state(callback)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn callback_route(
    State(handler): State<Arc<CallbackHandler>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    handler.handle(&query).await
}

/// Binds `addr` and serves until the listener fails.
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Callback server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
