//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Defaults are placeholders for local development; deployments are
//! expected to override the WebDAV credentials, the preview token and the
//! admin password.

use serde::{Deserialize, Serialize};

/// Root configuration for both services.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// File-service gateway settings.
    pub gateway: GatewayConfig,

    /// WebDAV backend the gateway talks to.
    pub webdav: WebDavConfig,

    /// Document-conversion service proxied under /api/kkfileview.
    pub viewer: ViewerConfig,

    /// Configurable reverse proxy settings.
    pub proxy: ProxyConfig,

    /// Admin panel settings.
    pub admin: AdminConfig,

    /// Persistent key-value store settings.
    pub store: StoreConfig,
}

/// File-service gateway listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Whether to run the gateway service at all.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Externally visible origin of this gateway. Used when rewriting
    /// conversion-service bodies so browsers fetch subresources through the
    /// /api/kkfileview proxy instead of the plain-HTTP service directly.
    pub public_url: String,

    /// Shared secret for the token-gated file proxy. Anyone holding this
    /// token can read files without WebDAV credentials.
    pub preview_token: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:8080".to_string(),
            public_url: "http://localhost:8080".to_string(),
            preview_token: "preview-token".to_string(),
        }
    }
}

/// WebDAV backend connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebDavConfig {
    /// Base URL of the WebDAV collection (e.g., "https://dav.example.net/dav/").
    pub url: String,

    /// Basic-auth username injected on every backend call.
    pub username: String,

    /// Basic-auth password injected on every backend call.
    pub password: String,
}

impl Default for WebDavConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8081/dav/".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Document-conversion (kkfileview) service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Origin of the conversion service, scheme included, no trailing slash
    /// (e.g., "http://converter.internal:8012"). Literal occurrences of this
    /// origin in HTML/CSS/JS responses are rewritten to the gateway proxy.
    pub service_origin: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            service_origin: "http://localhost:8012".to_string(),
        }
    }
}

/// Configurable reverse proxy settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Whether to run the proxy service at all.
    pub enabled: bool,

    /// Bind address (e.g., "0.0.0.0:8090").
    pub bind_address: String,

    /// Built-in upstream used whenever the store has no saved target or the
    /// saved entry cannot be read. "host:port" assumes https; prefix with
    /// "http://" to force plain HTTP.
    pub default_target: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:8090".to_string(),
            default_target: "localhost:8443".to_string(),
        }
    }
}

/// Admin panel settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared admin password. The session cookie carries this value verbatim;
    /// there is no per-user identity and no lockout (see DESIGN.md).
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: "password".to_string(),
        }
    }
}

/// Persistent key-value store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON state file holding `current_config` and
    /// `config_history`.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "proxy-state.json".to_string(),
        }
    }
}
