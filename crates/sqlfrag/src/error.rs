//! Error types for sqlfrag

use thiserror::Error;

/// Result type alias for sqlfrag operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while assembling or compiling a fragment tree.
///
/// All of them signal misuse of the tree: the caller fixes the tree and
/// compiles again. A failed compile leaves nothing behind to roll back.
#[derive(Debug, Error)]
pub enum SqlError {
    /// A list-shaped clause was compiled with no elements
    #[error("List is empty: {0}")]
    EmptyList(&'static str),

    /// A query was compiled without SELECT, INSERT, UPDATE or DELETE
    #[error("Query is empty")]
    EmptyQuery,

    /// The engine does not support a clause the tree requires
    #[error("Clause not supported by {dialect}: {clause}")]
    ClauseNotSupported {
        dialect: String,
        clause: &'static str,
    },

    /// Engine metadata contradicts itself
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A stateful builder call was made in the wrong state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A fragment was built with a malformed argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity type was referenced that the engine has no metadata for
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// An entity field has no column mapping
    #[error("Unknown column '{field}' on entity {entity}")]
    UnknownColumn { entity: String, field: String },

    /// Engine options could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create a clause-not-supported error
    pub fn not_supported(dialect: impl Into<String>, clause: &'static str) -> Self {
        Self::ClauseNotSupported {
            dialect: dialect.into(),
            clause,
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Check if this is an empty list error
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Self::EmptyList(_))
    }

    /// Check if this is an empty query error
    pub fn is_empty_query(&self) -> bool {
        matches!(self, Self::EmptyQuery)
    }

    /// Check if this is a clause-not-supported error
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::ClauseNotSupported { .. })
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
