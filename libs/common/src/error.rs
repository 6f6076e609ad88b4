//! Custom error types for the common library
//!
//! This module defines the storage error taxonomy shared by every store
//! implementation in the workspace.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl DatabaseError {
    /// Classify a query failure, pulling unique violations out of the generic bucket
    pub fn from_query(err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return DatabaseError::UniqueViolation(constraint);
            }
        }

        DatabaseError::Query(err)
    }

    /// Whether this error reports a duplicate key
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_a_query_error() {
        let err = DatabaseError::from_query(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(SqlxError::RowNotFound)));
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_unique_violation_display() {
        let err = DatabaseError::UniqueViolation("users_email_key".to_string());
        assert!(err.is_unique_violation());
        assert_eq!(
            err.to_string(),
            "Unique constraint violated: users_email_key"
        );
    }
}
