//! Configuration error types

/// Errors raised while loading or validating the server configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO-related errors (file access, permissions, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration validation errors
    #[error("Configuration validation error: {0}")]
    Validation(String),

    /// An environment override could not be parsed
    #[error("Invalid value for {name}: {value}")]
    InvalidOverride { name: String, value: String },
}

impl ConfigError {
    /// Create a validation error with context
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
