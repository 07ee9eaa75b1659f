//! Embedded file-browser UI.

use axum::http::header;
use axum::response::{IntoResponse, Response};

const BROWSER_PAGE: &str = include_str!("../../assets/browser.html");

/// Any path not claimed by the API serves the single-page file browser.
pub async fn index() -> Response {
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        BROWSER_PAGE,
    )
        .into_response()
}
