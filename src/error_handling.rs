//! Error type definitions.
//!
//! `AnalysisError` is the failure taxonomy for a single analysis call; the
//! remaining enums cover process startup and database plumbing.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Failure taxonomy for a page analysis.
///
/// Every variant aborts the analysis before any result is persisted. Per-link
/// probe failures are deliberately absent: they are absorbed into
/// `inaccessible_links` and never surface as a top-level error.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The submitted URL is not an absolute http(s) URI.
    #[error("invalid URL: {0}")]
    Input(String),

    /// The primary page could not be fetched at the transport level.
    ///
    /// A non-2xx response is *not* a fetch error; the body of an error page
    /// is still analyzable.
    #[error("failed to fetch page: {0}")]
    Fetch(#[source] ReqwestError),

    /// The fetched document could not be decoded into text at all.
    ///
    /// Rare in practice: the HTML tokenizer itself is permissive and does
    /// not reject malformed markup.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The caller cancelled, or the overall deadline elapsed. In-flight
    /// probes are abandoned and nothing is persisted.
    #[error("analysis cancelled before completion")]
    Cancelled,

    /// The result store was unavailable or rejected the reconcile step.
    #[error("storage error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = AnalysisError::Input("relative URL without a base".to_string());
        assert_eq!(err.to_string(), "invalid URL: relative URL without a base");
    }

    #[test]
    fn test_cancelled_error_display() {
        assert_eq!(
            AnalysisError::Cancelled.to_string(),
            "analysis cancelled before completion"
        );
    }

    #[test]
    fn test_persistence_error_from_sqlx() {
        let err: AnalysisError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AnalysisError::Persistence(_)));
        assert!(err.to_string().starts_with("storage error:"));
    }

    #[test]
    fn test_database_error_display() {
        let err = DatabaseError::FileCreationError("permission denied".to_string());
        assert_eq!(
            err.to_string(),
            "Database file creation error: permission denied"
        );
    }
}
