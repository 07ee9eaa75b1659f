//! End-to-end tests for the file-service gateway against a mock WebDAV
//! backend and a mock conversion service.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use axum::Router;
use edge_gateway::config::AppConfig;
use edge_gateway::gateway::{self, GatewayState};
use serde_json::Value;

async fn spawn_gateway(webdav: SocketAddr) -> SocketAddr {
    let mut config = AppConfig::default();
    config.webdav.url = format!("http://{webdav}/dav/");
    config.webdav.username = "dav-user".to_string();
    config.webdav.password = "dav-pass".to_string();
    common::spawn_app(gateway::router(GatewayState::new(Arc::new(config)))).await
}

#[tokio::test]
async fn upload_then_download_roundtrip() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{app}/api/upload?path=docs/note.txt"))
        .body("hello webdav")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client
        .get(format!("http://{app}/api/download?path=docs/note.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain"
    );
    assert_eq!(
        res.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"note.txt\""
    );
    assert_eq!(res.text().await.unwrap(), "hello webdav");
}

#[tokio::test]
async fn inline_download_and_unknown_extension() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    client
        .put(format!("http://{app}/api/upload?path=blob.xyz"))
        .body("opaque")
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("http://{app}/api/download?path=blob.xyz&inline=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/octet-stream"
    );
    assert_eq!(
        res.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "inline; filename=\"blob.xyz\""
    );
}

#[tokio::test]
async fn missing_path_is_bad_request() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{app}/api/download"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "Missing path parameter");
}

#[tokio::test]
async fn mkdir_is_idempotent() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let res = client
            .get(format!("http://{app}/api/mkdir?path=photos"))
            .send()
            .await
            .unwrap();
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["success"], true);
    }
}

#[tokio::test]
async fn delete_reports_backend_verdict() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    client
        .put(format!("http://{app}/api/upload?path=tmp.txt"))
        .body("x")
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("http://{app}/api/delete?path=tmp.txt"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    // Second delete hits a missing resource.
    let res = client
        .get(format!("http://{app}/api/delete?path=tmp.txt"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn move_and_copy_relocate_files() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    client
        .put(format!("http://{app}/api/upload?path=a.txt"))
        .body("payload")
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("http://{app}/api/move?source=a.txt&dest=b.txt"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client
        .get(format!("http://{app}/api/copy?source=b.txt&dest=c.txt"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let listing = client
        .get(format!("http://{app}/api/list?path="))
        .send()
        .await
        .unwrap();
    assert_eq!(
        listing.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );
    let xml = listing.text().await.unwrap();
    assert!(!xml.contains("a.txt"));
    assert!(xml.contains("b.txt"));
    assert!(xml.contains("c.txt"));
}

#[tokio::test]
async fn create_link_stores_trimmed_url() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{app}/api/create-link?path=movie.url"))
        .body("  https://example.com/v \n")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let res = client
        .get(format!("http://{app}/api/download?path=movie.url&inline=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "https://example.com/v");
}

#[tokio::test]
async fn preflight_gets_cors_headers() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{app}/api/upload"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert!(res
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("PROPFIND"));
}

#[tokio::test]
async fn responses_carry_open_cors() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{app}/api/list?path="))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn file_proxy_rejects_bad_token_before_anything_else() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    // Wrong token, no path: 401 wins.
    let res = client
        .get(format!("http://{app}/api/file-proxy?token=wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    // Right token, no path: 400.
    let res = client
        .get(format!("http://{app}/api/file-proxy?token=preview-token"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn file_proxy_pins_document_content_type() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    client
        .put(format!("http://{app}/api/upload?path=slides.pptx"))
        .body("fake-pptx-bytes")
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!(
            "http://{app}/api/file-proxy/slides.pptx?path=slides.pptx&token=preview-token"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    );
    assert_eq!(
        res.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=3600"
    );

    let res = client
        .get(format!(
            "http://{app}/api/file-proxy?path=nope.pdf&token=preview-token"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "File not found: nope.pdf");
}

#[tokio::test]
async fn viewer_html_gets_rewritten_and_instrumented() {
    let webdav = common::spawn_webdav().await;

    // Conversion service that references its own origin in the page.
    let viewer_router = Router::new().fallback(|headers: HeaderMap| async move {
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let page = format!(
            "<html><body><script src=\"http://{host}/static/app.js\"></script></body></html>"
        );
        ([(header::CONTENT_TYPE, "text/html")], page)
    });
    let viewer = common::spawn_app(viewer_router).await;

    let mut config = AppConfig::default();
    config.webdav.url = format!("http://{webdav}/dav/");
    config.viewer.service_origin = format!("http://{viewer}");
    config.gateway.public_url = "http://localhost:8080".to_string();
    let app = common::spawn_app(gateway::router(GatewayState::new(Arc::new(config)))).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{app}/api/kkfileview/onlinePreview?url=abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();

    // Origin rewritten to the gateway's proxy path.
    assert!(body.contains("http://localhost:8080/api/kkfileview/static/app.js"));
    assert!(!body.contains(&format!("http://{viewer}")));
    // Control script injected before the closing body tag.
    assert!(body.contains("findPDFViewerApp"));
    let script_pos = body.find("findPDFViewerApp").unwrap();
    let body_close = body.rfind("</body>").unwrap();
    assert!(script_pos < body_close);
}

#[tokio::test]
async fn viewer_forward_requests_uncompressed_bodies() {
    let webdav = common::spawn_webdav().await;

    // gzip of "<html><body>compressed variant</body></html>"
    const GZIPPED: &[u8] = &[
        31, 139, 8, 0, 0, 0, 0, 0, 2, 3, 179, 201, 40, 201, 205, 177, 179, 73, 202, 79, 169, 180,
        75, 206, 207, 45, 40, 74, 45, 46, 78, 77, 81, 40, 75, 44, 202, 76, 204, 43, 177, 209, 7,
        75, 216, 232, 131, 85, 1, 0, 184, 215, 132, 184, 44, 0, 0, 0,
    ];

    // Conversion service that gzips whenever the request allows it.
    let viewer_router = Router::new().fallback(|headers: HeaderMap| async move {
        let accept = headers
            .get(header::ACCEPT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if accept.contains("gzip") {
            (
                [
                    (header::CONTENT_TYPE, "text/html"),
                    (header::CONTENT_ENCODING, "gzip"),
                ],
                GZIPPED.to_vec(),
            )
                .into_response()
        } else {
            (
                [(header::CONTENT_TYPE, "text/html")],
                format!("<html><body>accept={accept}</body></html>"),
            )
                .into_response()
        }
    });
    let viewer = common::spawn_app(viewer_router).await;

    let mut config = AppConfig::default();
    config.webdav.url = format!("http://{webdav}/dav/");
    config.viewer.service_origin = format!("http://{viewer}");
    let app = common::spawn_app(gateway::router(GatewayState::new(Arc::new(config)))).await;

    // A browser advertising gzip must still get rewritable plain text back.
    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{app}/api/kkfileview/onlinePreview?url=abc"))
        .header(header::ACCEPT_ENCODING, "gzip, deflate, br")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().get(header::CONTENT_ENCODING).is_none());
    let body = res.text().await.unwrap();
    assert!(body.contains("accept=identity"));
    assert!(body.contains("findPDFViewerApp"));
}

#[tokio::test]
async fn unknown_path_serves_browser_page() {
    let webdav = common::spawn_webdav().await;
    let app = spawn_gateway(webdav).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{app}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let page = res.text().await.unwrap();
    assert!(page.contains("file-list"));
}
