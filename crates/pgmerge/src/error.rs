//! Error types for pgmerge

use thiserror::Error;

/// Result type alias for pgmerge operations
pub type MergeResult<T> = Result<T, MergeError>;

/// Error types for building and running MERGE statements
#[derive(Debug, Error)]
pub enum MergeError {
    /// `MERGE INTO` has no target table
    #[error("merge statements must specify a target table")]
    MissingTarget,

    /// No `USING` source was configured
    #[error("merge statements must specify a using statement")]
    MissingUsingClause,

    /// No `ON` predicate was configured
    #[error("merge statements must specify an on statement")]
    MissingOnClause,

    /// Execution was requested without a runner
    #[error("cannot run; no runner set (use run_with)")]
    RunnerNotSet,

    /// The runner cannot return a single row
    #[error("cannot query row; runner does not support single-row queries")]
    RunnerLacksQueryRow,

    /// Placeholder rewriting rejected the assembled SQL
    #[error("Placeholder error: {0}")]
    Placeholder(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl MergeError {
    /// Create a placeholder rewrite error
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self::Placeholder(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Whether this error was raised while validating the statement, before any SQL was produced
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingTarget | Self::MissingUsingClause | Self::MissingOnClause
        )
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Parse a tokio_postgres error into a more specific MergeError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            if db_err.code().code() == "23505" {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return Self::UniqueViolation(format!("{}: {}", constraint, db_err.message()));
            }
        }
        Self::Query(err)
    }
}
