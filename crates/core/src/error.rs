//! Centralized error types for the pymod workspace.

use thiserror::Error;

/// Top-level error enum. Variants map to subsystems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PymodError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid module path: {0}")]
    InvalidModulePath(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Toolchain error: {0}")]
    Toolchain(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PymodResult<T> = Result<T, PymodError>;
