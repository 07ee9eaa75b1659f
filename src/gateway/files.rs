//! File-management handlers: one WebDAV call each, `{"success": bool}` out.
//!
//! The backend is the source of truth: a MOVE that reports failure leaves
//! the source untouched and the handler just relays the verdict. Nothing is
//! retried.

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::GatewayError;
use crate::gateway::GatewayState;
use crate::http::mime;
use crate::webdav::Relocation;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: Option<String>,
    pub inline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RelocateQuery {
    pub source: Option<String>,
    pub dest: Option<String>,
}

fn success(ok: bool) -> Json<serde_json::Value> {
    Json(json!({ "success": ok }))
}

/// GET /api/list?path=. PROPFIND Depth 1, raw XML passed through.
pub async fn list(
    State(state): State<GatewayState>,
    Query(query): Query<PathQuery>,
) -> Result<Response, GatewayError> {
    let path = query.path.unwrap_or_default();
    let response = state.webdav.propfind(&path).await?;
    let status = response.status();
    let body = response.text().await?;

    tracing::debug!(path = %path, status = %status, "listed collection");
    Ok((
        [(header::CONTENT_TYPE, "application/xml")],
        body,
    )
        .into_response())
}

/// PUT|POST /api/upload?path=. Streams the request body into the store.
pub async fn upload(
    State(state): State<GatewayState>,
    Query(query): Query<PathQuery>,
    body: Body,
) -> Result<Json<serde_json::Value>, GatewayError> {
    let path = query.path.ok_or(GatewayError::MissingParam("path"))?;
    let response = state
        .webdav
        .put(&path, reqwest::Body::wrap_stream(body.into_data_stream()))
        .await?;

    tracing::debug!(path = %path, status = %response.status(), "uploaded file");
    Ok(success(response.status().is_success()))
}

/// GET /api/download?path=&inline=. Streams the file back with the MIME
/// table's Content-Type and a disposition naming the final path segment.
pub async fn download(
    State(state): State<GatewayState>,
    Query(query): Query<PathQuery>,
) -> Result<Response, GatewayError> {
    let path = query.path.ok_or(GatewayError::MissingParam("path"))?;
    let inline = query.inline.as_deref() == Some("true");

    let response = state.webdav.get(&path).await?;

    let filename = mime::filename_of(&path).to_string();
    let content_type = mime::content_type_for(mime::extension_of(&filename).as_deref());
    let disposition = if inline { "inline" } else { "attachment" };

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("{disposition}; filename=\"{filename}\""),
        )
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|e| GatewayError::BadRequest(e.to_string()))
}

/// GET /api/delete?path=
pub async fn delete(
    State(state): State<GatewayState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    let path = query.path.ok_or(GatewayError::MissingParam("path"))?;
    let response = state.webdav.delete(&path).await?;
    Ok(success(response.status().is_success()))
}

/// GET /api/mkdir?path=. A 405 from the backend means the collection
/// already exists; creation is idempotent, so that counts as success.
pub async fn mkdir(
    State(state): State<GatewayState>,
    Query(query): Query<PathQuery>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    let path = query.path.ok_or(GatewayError::MissingParam("path"))?;
    let status = state.webdav.mkcol(&path).await?.status();
    Ok(success(status.is_success() || status.as_u16() == 405))
}

/// GET /api/move?source=&dest=
pub async fn move_entry(
    State(state): State<GatewayState>,
    Query(query): Query<RelocateQuery>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    relocate(&state, Relocation::Move, query).await
}

/// GET /api/copy?source=&dest=
pub async fn copy_entry(
    State(state): State<GatewayState>,
    Query(query): Query<RelocateQuery>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    relocate(&state, Relocation::Copy, query).await
}

async fn relocate(
    state: &GatewayState,
    kind: Relocation,
    query: RelocateQuery,
) -> Result<Json<serde_json::Value>, GatewayError> {
    let source = query.source.ok_or(GatewayError::MissingParam("source"))?;
    let dest = query.dest.ok_or(GatewayError::MissingParam("dest"))?;

    let response = state.webdav.relocate(kind, &source, &dest).await?;
    tracing::debug!(
        source = %source,
        dest = %dest,
        status = %response.status(),
        "relocated entry"
    );
    Ok(success(response.status().is_success()))
}

/// POST /api/create-link?path=. The body is the target URL, stored verbatim
/// (trimmed) as a text file.
pub async fn create_link(
    State(state): State<GatewayState>,
    Query(query): Query<PathQuery>,
    body: String,
) -> Result<Json<serde_json::Value>, GatewayError> {
    let path = query.path.ok_or(GatewayError::MissingParam("path"))?;
    let response = state.webdav.put_text(&path, body.trim().to_string()).await?;
    Ok(success(response.status().is_success()))
}
