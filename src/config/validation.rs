//! Configuration validation.
//!
//! Semantic checks only (serde handles syntax). All violations are reported,
//! not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// Upper bound for `scan.recent_tx_limit`.
pub const MAX_RECENT_TX_LIMIT: usize = 1_000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::new("listener.bind_address", e.to_string()));
    }

    match url::Url::parse(&config.node.rpc_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "node.rpc_url",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("node.rpc_url", e.to_string())),
    }

    if config.node.rpc_timeout_secs == Some(0) {
        errors.push(ValidationError::new("node.rpc_timeout_secs", "must be greater than zero"));
    }

    let limit = config.scan.recent_tx_limit;
    if limit == 0 || limit > MAX_RECENT_TX_LIMIT {
        errors.push(ValidationError::new(
            "scan.recent_tx_limit",
            format!("must be between 1 and {}", MAX_RECENT_TX_LIMIT),
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError::new("observability.metrics_address", e.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
