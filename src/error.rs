//! Error type shared by both routers.
//!
//! # Design Decisions
//! - Handlers return `Result<_, GatewayError>`; the outermost conversion to a
//!   response happens in `IntoResponse`, so no handler builds error bodies by
//!   hand.
//! - Unexpected failures become a 500 JSON body that carries the error
//!   message. This mirrors the deployed behavior and is a documented
//!   hardening gap, not an accident (see DESIGN.md).
//! - Missing parameters are 400 plain text; auth failures are 401 plain text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::http::cors;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Outbound call to the WebDAV backend or an upstream failed at the
    /// transport level (non-2xx statuses are not errors; they pass through).
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Forwarding to the document-conversion service failed.
    #[error("kkfileview proxy error: {0}")]
    Viewer(String),

    /// A required query parameter was absent.
    #[error("Missing {0} parameter")]
    MissingParam(&'static str),

    /// Token or cookie did not match the configured secret.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let mut response = match self {
            GatewayError::MissingParam(_) | GatewayError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            GatewayError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": other.to_string() })),
                )
                    .into_response()
            }
        };
        cors::apply(response.headers_mut());
        response
    }
}
