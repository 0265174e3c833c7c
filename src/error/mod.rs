//! Crate-wide error type for the startup paths.
//!
//! Per-request failures never surface through this type: lookups return
//! `Option`, dangling references resolve to nothing, and token problems are
//! reported through [`crate::auth::AuthenticationError`]. Anything that ends
//! up as a [`FlowGraphError`] stops the process before it binds.

use crate::config::ConfigError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FlowGraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A record collection or identity file could not be read or parsed.
    #[error("Failed to load {}: {reason}", .path.display())]
    DataLoad { path: PathBuf, reason: String },

    #[error("Invalid reference identity: {0}")]
    Identity(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl FlowGraphError {
    pub fn data_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type FlowGraphResult<T> = Result<T, FlowGraphError>;
