//! Shared utilities for integration testing: in-process servers plus mock
//! WebDAV and upstream backends.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Bind a router on an ephemeral port and serve it in the background.
pub async fn spawn_app(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Start a mock upstream that answers everything with a fixed body.
pub async fn spawn_upstream(body: &'static str) -> SocketAddr {
    let router = Router::new().fallback(move || async move { body });
    spawn_app(router).await
}

static SEQ: AtomicU32 = AtomicU32::new(0);

/// Unique state-file path per test.
pub fn temp_store_path() -> PathBuf {
    let n = SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "edge-gateway-it-{}-{}.json",
        std::process::id(),
        n
    ))
}

#[derive(Default)]
struct DavState {
    files: HashMap<String, Vec<u8>>,
    collections: HashSet<String>,
}

type SharedDav = Arc<Mutex<DavState>>;

/// Start a minimal in-memory WebDAV server rooted at `/dav/`.
///
/// Implements just enough of the protocol for the gateway: PROPFIND listing,
/// GET/PUT/DELETE on files, MKCOL (405 when the collection exists), and
/// MOVE/COPY driven by the Destination header.
pub async fn spawn_webdav() -> SocketAddr {
    let state: SharedDav = Arc::new(Mutex::new(DavState::default()));
    let router = Router::new().fallback(dav_handler).with_state(state);
    spawn_app(router).await
}

fn dav_path(raw: &str) -> String {
    raw.strip_prefix("/dav/").unwrap_or(raw).to_string()
}

fn destination_path(headers: &HeaderMap) -> Option<String> {
    let dest = headers.get("Destination")?.to_str().ok()?;
    let after_scheme = dest.split_once("://").map(|(_, rest)| rest).unwrap_or(dest);
    let path = after_scheme.split_once('/').map(|(_, p)| p)?;
    Some(path.strip_prefix("dav/").unwrap_or(path).to_string())
}

async fn dav_handler(State(state): State<SharedDav>, request: Request) -> Response {
    let method = request.method().as_str().to_string();
    let path = dav_path(request.uri().path());
    let headers = request.headers().clone();

    if headers.get(header::AUTHORIZATION).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_else(|_| Bytes::new());

    let mut dav = state.lock().await;
    match method.as_str() {
        "PROPFIND" => {
            let prefix = if path.is_empty() {
                String::new()
            } else {
                format!("{}/", path.trim_end_matches('/'))
            };
            let mut entries = String::new();
            for name in dav.files.keys().filter(|k| k.starts_with(&prefix)) {
                entries.push_str(&format!(
                    "<D:response><D:href>/dav/{name}</D:href><D:propstat><D:prop><D:resourcetype/></D:prop></D:propstat></D:response>"
                ));
            }
            for name in dav.collections.iter().filter(|k| k.starts_with(&prefix)) {
                entries.push_str(&format!(
                    "<D:response><D:href>/dav/{name}/</D:href><D:propstat><D:prop><D:resourcetype><D:collection/></D:resourcetype></D:prop></D:propstat></D:response>"
                ));
            }
            let xml = format!(
                "<?xml version=\"1.0\"?><D:multistatus xmlns:D=\"DAV:\">{entries}</D:multistatus>"
            );
            (
                StatusCode::MULTI_STATUS,
                [(header::CONTENT_TYPE, "application/xml")],
                xml,
            )
                .into_response()
        }
        "GET" => match dav.files.get(&path) {
            Some(content) => content.clone().into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
        "PUT" => {
            dav.files.insert(path, body.to_vec());
            StatusCode::CREATED.into_response()
        }
        "DELETE" => {
            if dav.files.remove(&path).is_some() || dav.collections.remove(&path) {
                StatusCode::NO_CONTENT.into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        "MKCOL" => {
            let name = path.trim_end_matches('/').to_string();
            if dav.collections.contains(&name) {
                StatusCode::METHOD_NOT_ALLOWED.into_response()
            } else {
                dav.collections.insert(name);
                StatusCode::CREATED.into_response()
            }
        }
        "MOVE" | "COPY" => {
            let Some(dest) = destination_path(&headers) else {
                return StatusCode::BAD_REQUEST.into_response();
            };
            let Some(content) = dav.files.get(&path).cloned() else {
                return StatusCode::NOT_FOUND.into_response();
            };
            if method == "MOVE" {
                dav.files.remove(&path);
            }
            dav.files.insert(dest, content);
            StatusCode::CREATED.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
