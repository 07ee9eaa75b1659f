//! Conversion-service proxy with mixed-content correction.
//!
//! Forwards /api/kkfileview/* verbatim to the configured service, then fixes
//! up the response: CORS headers always; for HTML/CSS/JS bodies the service
//! origin is rewritten to this gateway's proxy path so an HTTPS page never
//! references the plain-HTTP service directly, and HTML additionally gets
//! the paging control script injected before the closing body tag.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};

use crate::error::GatewayError;
use crate::gateway::GatewayState;
use crate::http::rewrite;

/// Script injected into viewer HTML. Listens for postMessage paging commands
/// from the presentation UI and drives the embedded PDF.js viewer.
const CONTROL_SCRIPT: &str = include_str!("../../assets/viewer_control.js");

const HOP_BY_HOP: &[header::HeaderName] = &[
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
];

/// ANY /api/kkfileview/*
pub async fn forward(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, GatewayError> {
    let service_origin = state.config.viewer.service_origin.trim_end_matches('/');

    let sub_path = request
        .uri()
        .path()
        .strip_prefix("/api/kkfileview")
        .unwrap_or("");
    let query = request
        .uri()
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();
    let target = format!("{service_origin}{sub_path}{query}");

    let (parts, body) = request.into_parts();
    let mut outbound_headers = parts.headers;
    outbound_headers.remove(header::HOST);
    // The rewrite below operates on plain text; never let the service
    // compress the response.
    outbound_headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    tracing::debug!(target = %target, method = %parts.method, "forwarding to viewer service");

    let upstream = state
        .client
        .request(parts.method, &target)
        .headers(outbound_headers)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await
        .map_err(|e| GatewayError::Viewer(e.to_string()))?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    for name in HOP_BY_HOP {
        headers.remove(name);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if is_rewritable(&content_type) {
        let text = upstream
            .text()
            .await
            .map_err(|e| GatewayError::Viewer(e.to_string()))?;

        let proxy_base = format!(
            "{}/api/kkfileview",
            state.config.gateway.public_url.trim_end_matches('/')
        );
        let mut text = rewrite::rewrite_origin(&text, service_origin, &proxy_base);

        if content_type.contains("text/html") {
            tracing::debug!("injecting control script into viewer HTML");
            let script = format!("<script>\n{CONTROL_SCRIPT}\n</script>\n");
            text = rewrite::inject_before_body_close(&text, &script);
        }

        // The body was rewritten as plain text; drop the stale framing
        // headers so the server recomputes them.
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::CONTENT_ENCODING);
        build_response(status, headers, Body::from(text))
    } else {
        build_response(status, headers, Body::from_stream(upstream.bytes_stream()))
    }
}

fn is_rewritable(content_type: &str) -> bool {
    content_type.contains("text/html")
        || content_type.contains("application/javascript")
        || content_type.contains("text/css")
}

fn build_response(
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, GatewayError> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
