//! Error types for pgstmt

use thiserror::Error;

/// Result type alias for pgstmt operations
pub type StmtResult<T> = Result<T, StmtError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum StmtError {
    /// Required schema metadata is absent (e.g. CREATE TABLE for a type
    /// without a table descriptor)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A type string has no SQL mapping for the target engine
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Query execution error, surfaced through the execution seam
    #[error("Query error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StmtError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an unsupported-type error
    pub fn unsupported_type(message: impl Into<String>) -> Self {
        Self::UnsupportedType(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is an unsupported-type error
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, Self::UnsupportedType(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
