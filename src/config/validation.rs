//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that bind addresses and backend URLs actually parse
//! - Catch empty secrets that would lock out every admin call
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs once, before the config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate an already-deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.gateway.enabled {
        check_addr(&mut errors, "gateway.bind_address", &config.gateway.bind_address);
        check_url(&mut errors, "webdav.url", &config.webdav.url);
        check_url(&mut errors, "viewer.service_origin", &config.viewer.service_origin);
        check_url(&mut errors, "gateway.public_url", &config.gateway.public_url);
        if config.gateway.preview_token.is_empty() {
            errors.push(ValidationError {
                field: "gateway.preview_token",
                message: "must not be empty".to_string(),
            });
        }
    }

    if config.proxy.enabled {
        check_addr(&mut errors, "proxy.bind_address", &config.proxy.bind_address);
        if config.proxy.default_target.is_empty() {
            errors.push(ValidationError {
                field: "proxy.default_target",
                message: "must not be empty".to_string(),
            });
        }
        if config.admin.password.is_empty() {
            errors.push(ValidationError {
                field: "admin.password",
                message: "must not be empty".to_string(),
            });
        }
        if config.store.path.is_empty() {
            errors.push(ValidationError {
                field: "store.path",
                message: "must not be empty".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field,
            message: format!("'{value}' is not a valid socket address"),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError {
            field,
            message: format!("'{value}' is not a valid URL"),
        });
    }
}
