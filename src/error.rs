//! Error types for squill.

use thiserror::Error;

/// The main error type for compilation of annotated SQL sources.
#[derive(Debug, Error)]
pub enum SquillError {
    /// A placeholder marker that can be classified neither as positional nor
    /// as keyword.
    #[error("malformed placeholder '{placeholder}' in statement: {statement}")]
    MalformedPlaceholder {
        placeholder: String,
        statement: String,
    },

    /// A driver name with no known native placeholder syntax.
    #[error("unsupported driver: '{0}'. Expected: postgres, psycopg, or sqlite")]
    UnsupportedDriver(String),

    /// IO error while loading query sources.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SquillError {
    /// Create a malformed-placeholder error for the given statement.
    pub fn malformed(placeholder: impl Into<String>, statement: impl Into<String>) -> Self {
        Self::MalformedPlaceholder {
            placeholder: placeholder.into(),
            statement: statement.into(),
        }
    }
}

/// Result type alias for squill operations.
pub type SquillResult<T> = Result<T, SquillError>;
