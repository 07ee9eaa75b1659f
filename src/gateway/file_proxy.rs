//! Token-gated file proxy.
//!
//! Lets the conversion service fetch WebDAV files it has no credentials for.
//! The token check runs before anything else: a bad token is 401 no matter
//! what the path looks like.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::GatewayError;
use crate::gateway::GatewayState;
use crate::http::mime;

#[derive(Debug, Deserialize)]
pub struct FileProxyQuery {
    pub path: Option<String>,
    pub token: Option<String>,
}

/// GET /api/file-proxy/*?path=&token=
pub async fn serve(
    State(state): State<GatewayState>,
    Query(query): Query<FileProxyQuery>,
) -> Result<Response, GatewayError> {
    if query.token.as_deref() != Some(state.config.gateway.preview_token.as_str()) {
        return Err(GatewayError::Unauthorized);
    }

    let path = query.path.ok_or(GatewayError::MissingParam("path"))?;

    let response = state.webdav.get(&path).await?;
    if !response.status().is_success() {
        tracing::debug!(path = %path, status = %response.status(), "file proxy miss");
        return Ok((StatusCode::NOT_FOUND, format!("File not found: {path}")).into_response());
    }

    // Document formats get a fixed type so the viewer trusts the body;
    // anything else defers to the backend.
    let backend_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let filename = mime::filename_of(&path);
    let content_type = mime::office_content_type(mime::extension_of(filename).as_deref())
        .map(str::to_string)
        .or(backend_type)
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|e| GatewayError::BadRequest(e.to_string()))
}
