//! Configuration management.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc with both routers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no ambient/global lookup.
//!   Credentials and targets always travel inside the config object.
//! - All fields have defaults so a minimal (or absent) config file works.
//! - Validation separates syntactic (serde) from semantic checks and reports
//!   every error, not just the first.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, AppConfig, GatewayConfig, ProxyConfig, StoreConfig, ViewerConfig, WebDavConfig,
};
