//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum CliError {
    /// Profile file not found
    #[error("Profile file not found: {path}")]
    ProfileNotFound { path: String },

    /// Profile loading error
    #[error("Failed to load profile: {message}")]
    ProfileLoad { message: String },

    /// Session execution error
    #[error("Session execution failed: {message}")]
    SessionExecution { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

#[allow(dead_code)]
impl CliError {
    pub fn profile_not_found(path: impl Into<String>) -> Self {
        Self::ProfileNotFound { path: path.into() }
    }

    pub fn profile_load(message: impl Into<String>) -> Self {
        Self::ProfileLoad {
            message: message.into(),
        }
    }

    pub fn session_execution(message: impl Into<String>) -> Self {
        Self::SessionExecution {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, CliError>;
