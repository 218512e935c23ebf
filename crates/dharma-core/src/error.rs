//! Error types for Dharma Core
//!
//! This module defines all error types used throughout the Dharma core engine.
//! We use `thiserror` for ergonomic error definitions with automatic Display/Error implementations.

use thiserror::Error;

/// Result type alias for Dharma operations
pub type Result<T> = std::result::Result<T, DharmaError>;

/// Main error type for Dharma operations
#[derive(Error, Debug)]
pub enum DharmaError {
    /// Optimization was requested over an empty candidate set
    #[error("Cannot optimize over an empty candidate list")]
    EmptyCandidates,

    /// Karma log errors
    #[error("Karma log error: {0}")]
    Log(#[from] LogError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<DharmaError>,
    },
}

/// Errors related to karma log operations
#[derive(Error, Debug, Clone)]
pub enum LogError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("Consequence references unknown parent action: {0}")]
    ParentNotFound(String),
}

impl DharmaError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }
}
