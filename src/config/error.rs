//! Configuration error types

use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Semantic problems in otherwise well-formed configuration
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Host and port do not form a socket address")]
    InvalidBindAddress,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool size must be between 1 and 100")]
    InvalidPoolSize,

    #[error("SHA-IN and SHA-OUT secrets must differ")]
    IdenticalSignatureSecrets,

    #[error("A database is required in production")]
    DatabaseRequired,
}
