//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Gateway base URL must start with http:// or https://")]
    InvalidGatewayUrl,

    #[error("Gateway timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Route '{0}' must start with '/'")]
    InvalidRoute(&'static str),
}
