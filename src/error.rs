//! Unified error types for the service.
//!
//! Request handlers never fail; these cover startup and serving only.

use thiserror::Error;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Binding the listener or serving connections failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
