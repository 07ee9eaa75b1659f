//! Catch-all forwarding to the active upstream.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue},
    response::Response,
};

use crate::error::GatewayError;
use crate::proxy::ProxyState;

const HOP_BY_HOP: &[header::HeaderName] = &[
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
];

/// Bare `host:port` targets get an https scheme; explicit schemes win.
fn target_base(target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        target.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", target.trim_end_matches('/'))
    }
}

/// Forward the request to the stored upstream (or the configured default),
/// streaming both bodies. The original path and query are preserved.
pub async fn forward(
    State(state): State<ProxyState>,
    request: Request,
) -> Result<Response, GatewayError> {
    let (target, used_default) = state
        .store
        .resolve_target(&state.config.proxy.default_target)
        .await;

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{path_and_query}", target_base(&target));

    let (parts, body) = request.into_parts();
    let mut outbound_headers = parts.headers;
    outbound_headers.remove(header::HOST);

    let upstream = state
        .client
        .request(parts.method.clone(), &url)
        .headers(outbound_headers)
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await?;

    tracing::debug!(
        method = %parts.method,
        target = %target,
        used_default,
        status = %upstream.status(),
        "forwarded request"
    );

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
