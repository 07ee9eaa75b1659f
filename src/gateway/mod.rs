//! File-service gateway router.
//!
//! Dispatches the fixed /api/* surface onto WebDAV verbs, proxies the
//! document-conversion service, and serves the embedded file browser for
//! everything else. Stateless apart from the shared config and the outbound
//! clients; every request maps to at most one backend call.

pub mod file_proxy;
pub mod files;
pub mod ui;
pub mod viewer;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get, post, put},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::cors;
use crate::webdav::WebDavClient;

/// State injected into gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<AppConfig>,
    pub webdav: WebDavClient,
    /// Client for forwarding to the conversion service.
    pub client: reqwest::Client,
}

impl GatewayState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let webdav = WebDavClient::new(&config.webdav);
        Self {
            config,
            webdav,
            client: reqwest::Client::new(),
        }
    }
}

/// Build the gateway router with all middleware layers.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/list", get(files::list))
        .route("/api/upload", put(files::upload).post(files::upload))
        .route("/api/download", get(files::download))
        .route("/api/delete", get(files::delete))
        .route("/api/mkdir", get(files::mkdir))
        .route("/api/move", get(files::move_entry))
        .route("/api/copy", get(files::copy_entry))
        .route("/api/create-link", post(files::create_link))
        .route("/api/file-proxy", get(file_proxy::serve))
        .route("/api/file-proxy/{*rest}", get(file_proxy::serve))
        .route("/api/kkfileview", any(viewer::forward))
        .route("/api/kkfileview/{*rest}", any(viewer::forward))
        .fallback(ui::index)
        .with_state(state)
        .layer(middleware::from_fn(cors::cors_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
