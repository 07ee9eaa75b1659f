//! Admin panel and JSON action API.
//!
//! `GET /admin` renders the login page for anonymous visitors and the
//! management panel for authenticated ones. `POST /admin/api` takes a JSON
//! body `{action, password?, url?}`; every action except `login` requires
//! the session cookie.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::proxy::{probe, session, ProxyState};
use crate::store::UpstreamRecord;

const LOGIN_PAGE: &str = include_str!("../../assets/login.html");
const ADMIN_PAGE: &str = include_str!("../../assets/admin.html");

#[derive(Debug, Deserialize)]
struct AdminRequest {
    action: String,
    password: Option<String>,
    url: Option<String>,
}

/// GET /admin
pub async fn panel(State(state): State<ProxyState>, headers: HeaderMap) -> Response {
    if !session::is_authenticated(&headers, &state.config.admin.password) {
        return html(LOGIN_PAGE.to_string());
    }

    let current = state.store.current().await.unwrap_or_else(|| UpstreamRecord {
        url: state.config.proxy.default_target.clone(),
        timestamp: String::new(),
    });
    let history = state.store.history().await;
    html(render_panel(&current, &history))
}

/// OPTIONS /admin/api
pub async fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

/// POST /admin/api
pub async fn api(State(state): State<ProxyState>, headers: HeaderMap, body: String) -> Response {
    let request: AdminRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => return failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };

    if request.action == "login" {
        return login(&state, request.password.as_deref());
    }

    if !session::is_authenticated(&headers, &state.config.admin.password) {
        return failure(StatusCode::UNAUTHORIZED, "未授权");
    }

    match request.action.as_str() {
        "test" => {
            let Some(url) = request.url else {
                return failure(StatusCode::BAD_REQUEST, "缺少 url 参数");
            };
            json_ok(
                serde_json::to_value(probe::test_connection(&state.client, &url).await)
                    .unwrap_or_else(|_| json!({ "success": false })),
            )
        }
        "save" => {
            let Some(url) = request.url else {
                return failure(StatusCode::BAD_REQUEST, "缺少 url 参数");
            };
            match state.store.save(&url).await {
                Ok(record) => json_ok(json!({ "success": true, "config": record })),
                Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
            }
        }
        "delete" => match state.store.delete_current().await {
            Ok(()) => json_ok(json!({ "success": true, "message": "已恢复默认配置" })),
            Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        },
        "clear_history" => match state.store.clear_history().await {
            Ok(()) => json_ok(json!({ "success": true, "message": "历史记录已清除" })),
            Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        },
        _ => json_ok(json!({ "success": false, "error": "未知操作" })),
    }
}

fn login(state: &ProxyState, password: Option<&str>) -> Response {
    if password != Some(state.config.admin.password.as_str()) {
        tracing::debug!("admin login rejected");
        return json_ok(json!({ "success": false, "error": "密码错误" }));
    }

    let mut response = json_ok(json!({ "success": true }));
    if let Ok(cookie) = HeaderValue::from_str(&session::login_cookie(&state.config.admin.password))
    {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

fn render_panel(current: &UpstreamRecord, history: &[UpstreamRecord]) -> String {
    let items = if history.is_empty() {
        "<p class=\"empty\">暂无历史记录</p>".to_string()
    } else {
        history
            .iter()
            .map(|record| {
                let url = escape_html(&record.url);
                format!(
                    concat!(
                        "<div class=\"history-item\">",
                        "<span class=\"history-url\">{url}</span>",
                        "<span class=\"history-time\">{time}</span>",
                        "<button class=\"use-btn\" data-url=\"{url}\">使用</button>",
                        "</div>"
                    ),
                    url = url,
                    time = escape_html(&record.timestamp),
                )
            })
            .collect()
    };

    ADMIN_PAGE
        .replace("{{current_url}}", &escape_html(&current.url))
        .replace("{{history_items}}", &items)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html(page: String) -> Response {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], page).into_response()
}

fn json_ok(value: serde_json::Value) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

fn failure(status: StatusCode, message: &str) -> Response {
    let mut response = (
        status,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}
