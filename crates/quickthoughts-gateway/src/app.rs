use axum::{
    routing::{any, delete, post},
    Router,
};
use std::sync::Arc;

use quickthoughts_core::config::QuickThoughtsConfig;
use quickthoughts_store::{CredentialStore, KvStore, ThoughtStore};
use quickthoughts_telegram::Messenger;

use crate::http;

/// Central shared state: passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: QuickThoughtsConfig,
    pub thoughts: ThoughtStore,
    pub credentials: CredentialStore,
    pub messenger: Arc<dyn Messenger>,
}

impl AppState {
    pub fn new(
        config: QuickThoughtsConfig,
        kv: Arc<dyn KvStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        let credentials = CredentialStore::new(kv.clone(), config.sync.secret.clone());
        Self {
            config,
            thoughts: ThoughtStore::new(kv),
            credentials,
            messenger,
        }
    }
}

/// Assemble the full Axum router.
///
/// `/`, `/sync` and `/setup-webhook` dispatch on path: every method other
/// than DELETE on `/sync` lists. Only `/webhook` is method-bound, and a
/// non-POST there answers 404 like an unknown path.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(http::health::root_handler))
        .route(
            "/webhook",
            post(http::webhook::webhook_handler).fallback(http::not_found),
        )
        .route(
            "/sync",
            delete(http::sync::clear_handler).fallback(http::sync::list_handler),
        )
        .route("/setup-webhook", any(http::setup::setup_handler))
        .fallback(http::not_found)
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
