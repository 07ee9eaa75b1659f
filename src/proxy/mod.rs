//! Configurable reverse proxy router.
//!
//! Everything except /admin and /admin/api is forwarded to whichever
//! upstream the store currently names (falling back to the configured
//! default). The admin surface is a server-rendered panel plus one JSON
//! action endpoint, both gated by a shared-secret cookie.

pub mod admin;
pub mod passthrough;
pub mod probe;
pub mod session;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::store::ConfigStore;

/// State injected into proxy handlers.
#[derive(Clone)]
pub struct ProxyState {
    pub config: Arc<AppConfig>,
    pub store: Arc<ConfigStore>,
    /// Client for passthrough forwarding and connectivity probes. Redirects
    /// are followed (reqwest default), matching the deployed behavior.
    pub client: reqwest::Client,
}

impl ProxyState {
    pub fn new(config: Arc<AppConfig>, store: Arc<ConfigStore>) -> Self {
        Self {
            config,
            store,
            client: reqwest::Client::new(),
        }
    }
}

/// Build the proxy router with all middleware layers.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/admin", get(admin::panel))
        .route("/admin/api", post(admin::api).options(admin::preflight))
        .fallback(passthrough::forward)
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
