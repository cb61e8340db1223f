//! Service layer error types.
//!
//! These errors represent failures during service construction and
//! startup: configuration issues, key loading, and database connectivity.
//! Request-time failures use the handler [`Error`] instead.
//!
//! [`Error`]: crate::handler::Error

use thiserror::Error;

/// Result type for service operations.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Service layer error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration error (invalid config values, missing files, etc.).
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Database connection or migration error.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication key loading or validation error.
    #[error("Authentication error: {message}")]
    Auth {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system operation error.
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ServiceError {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new file system error.
    pub fn file_system(message: impl Into<String>) -> Self {
        Self::FileSystem {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        let slot = match &mut self {
            Self::Config { source, .. }
            | Self::Database { source, .. }
            | Self::Auth { source, .. }
            | Self::FileSystem { source, .. } => source,
        };
        *slot = Some(Box::new(source));
        self
    }

    /// Returns the error category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "configuration",
            Self::Database { .. } => "database",
            Self::Auth { .. } => "authentication",
            Self::FileSystem { .. } => "file_system",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn error_creation() {
        let error = ServiceError::config("invalid configuration");
        assert_eq!(error.category(), "configuration");
        assert!(error.to_string().contains("invalid configuration"));
    }

    #[test]
    fn error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ServiceError::file_system("cannot read key file").with_source(source);

        assert_eq!(error.category(), "file_system");
        assert!(error.source().is_some());
    }
}
