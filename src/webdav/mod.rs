//! Credential-injecting WebDAV client.
//!
//! A thin wrapper over `reqwest` that knows the backend base URL and stamps
//! Basic auth onto every call. It deliberately does not parse PROPFIND
//! responses: listings pass through to the browser as raw XML, and the
//! backend stays the single source of truth for success/failure.

use reqwest::{Client, Method, Response};

use crate::config::WebDavConfig;

/// Direction of a relocation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    Move,
    Copy,
}

impl Relocation {
    fn method(self) -> Method {
        match self {
            // The verbs only exist as extension methods.
            Relocation::Move => Method::from_bytes(b"MOVE").expect("valid method"),
            Relocation::Copy => Method::from_bytes(b"COPY").expect("valid method"),
        }
    }
}

/// WebDAV client bound to one backend collection.
#[derive(Debug, Clone)]
pub struct WebDavClient {
    http: Client,
    base: String,
    username: String,
    password: String,
}

impl WebDavClient {
    pub fn new(config: &WebDavConfig) -> Self {
        Self {
            http: Client::new(),
            base: ensure_trailing_slash(&config.url),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    /// Absolute backend URL for a store-relative path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url_for(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Shallow directory listing (PROPFIND, Depth 1). Returns the raw
    /// backend response.
    pub async fn propfind(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.request(Method::from_bytes(b"PROPFIND").expect("valid method"), path)
            .header("Depth", "1")
            .send()
            .await
    }

    /// Retrieve a file.
    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.request(Method::GET, path).send().await
    }

    /// Store a file with a streamed body.
    pub async fn put(
        &self,
        path: &str,
        body: reqwest::Body,
    ) -> Result<Response, reqwest::Error> {
        self.request(Method::PUT, path).body(body).send().await
    }

    /// Store a small text file (used for .url link files).
    pub async fn put_text(&self, path: &str, text: String) -> Result<Response, reqwest::Error> {
        self.request(Method::PUT, path)
            .header("Content-Type", "text/plain")
            .body(text)
            .send()
            .await
    }

    /// Remove a file or collection.
    pub async fn delete(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.request(Method::DELETE, path).send().await
    }

    /// Create a collection. The trailing slash is required by some servers.
    pub async fn mkcol(&self, path: &str) -> Result<Response, reqwest::Error> {
        let path = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        self.request(Method::from_bytes(b"MKCOL").expect("valid method"), &path)
            .send()
            .await
    }

    /// MOVE or COPY with overwrite enabled. `dest` is store-relative; the
    /// Destination header wants the absolute backend URL.
    pub async fn relocate(
        &self,
        kind: Relocation,
        source: &str,
        dest: &str,
    ) -> Result<Response, reqwest::Error> {
        self.request(kind.method(), source)
            .header("Destination", self.url_for(dest))
            .header("Overwrite", "T")
            .send()
            .await
    }
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
