//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check endpoint URLs parse and names are unique
//! - Validate value ranges (attempt budget, timeouts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PoolConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

use crate::config::schema::PoolConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("node pool is empty; a pool needs at least one connection")]
    EmptyPool,

    #[error("endpoint '{name}' has an invalid url '{url}': {reason}")]
    InvalidEndpointUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("endpoint name '{0}' is used more than once")]
    DuplicateEndpointName(String),

    #[error("dispatch.max_retries must be >= 1 (it is the total attempts per node)")]
    ZeroRetries,

    #[error("http.request_timeout_ms must be > 0")]
    ZeroRequestTimeout,
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &PoolConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoints.is_empty() {
        errors.push(ValidationError::EmptyPool);
    }

    let mut seen_names = HashSet::new();
    for endpoint in &config.endpoints {
        if !seen_names.insert(endpoint.name.as_str()) {
            errors.push(ValidationError::DuplicateEndpointName(endpoint.name.clone()));
        }
        if let Err(e) = Url::parse(&endpoint.url) {
            errors.push(ValidationError::InvalidEndpointUrl {
                name: endpoint.name.clone(),
                url: endpoint.url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.dispatch.max_retries == 0 {
        errors.push(ValidationError::ZeroRetries);
    }

    if config.http.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
