//! Edge Gateway
//!
//! Two small edge HTTP services sharing one binary:
//!
//! ```text
//!                 ┌─────────────────────────────────────────────────┐
//!                 │                  EDGE GATEWAY                   │
//!                 │                                                 │
//!   /api/*  ──────┼─▶ gateway ──▶ webdav client ──▶ WebDAV backend  │
//!   /api/kkfileview/* ─▶ gateway ──▶ viewer proxy ──▶ converter svc │
//!   /       ──────┼─▶ gateway ──▶ embedded file-browser UI          │
//!                 │                                                 │
//!   /admin, /admin/api ─▶ proxy ──▶ config store (JSON file)        │
//!   /*      ──────┼─▶ proxy   ──▶ configurable upstream             │
//!                 │                                                 │
//!                 │  cross-cutting: config, cors, mime, rewrite,    │
//!                 │  tracing + request IDs, error → JSON mapping    │
//!                 └─────────────────────────────────────────────────┘
//! ```
//!
//! The gateway router translates file-management calls into WebDAV verbs with
//! credential injection and permissive CORS on every response. The proxy
//! router forwards everything else to an upstream host that can be swapped at
//! runtime through a cookie-gated admin panel, with a bounded history of
//! previous targets kept for rollback.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod proxy;
pub mod store;
pub mod webdav;

pub use config::AppConfig;
pub use error::GatewayError;
