//! Permissive CORS handling.
//!
//! Every response from either router is CORS-open: the file browser and the
//! conversion service both run on foreign origins and call straight into the
//! API. The allowed method list includes the WebDAV verbs so preflights for
//! proxied PROPFIND/MKCOL calls pass.

use axum::body::Body;
use axum::http::{header::HeaderName, HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, COPY, MOVE, OPTIONS, PROPFIND, MKCOL";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, Depth, Destination, Overwrite";

/// Insert the permissive CORS headers into `headers`, overwriting any
/// upstream values.
pub fn apply(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// 204 preflight response.
pub fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply(response.headers_mut());
    response
}

/// Middleware: answer OPTIONS directly with 204, and stamp CORS headers onto
/// every other response.
pub async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight();
    }
    let mut response = next.run(request).await;
    apply(response.headers_mut());
    response
}
