//! Cookie-based admin session.
//!
//! The session token is the admin password itself, set as an HttpOnly
//! cookie on successful login and compared on every admin action.

use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE: &str = "admin_auth";

/// One day, in seconds.
const SESSION_MAX_AGE: u32 = 86400;

/// Pull a single cookie out of the Cookie header, if present.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

pub fn is_authenticated(headers: &HeaderMap, password: &str) -> bool {
    cookie_value(headers, SESSION_COOKIE).as_deref() == Some(password)
}

/// Set-Cookie value handed out after a successful login.
pub fn login_cookie(password: &str) -> String {
    format!("{SESSION_COOKIE}={password}; Path=/; HttpOnly; Max-Age={SESSION_MAX_AGE}")
}
