//! Application error types for storefront
//!
//! This module defines common error types used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Authentication-related errors
///
/// Every variant is an "unauthorized" outcome for the caller. None of them
/// are retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed token, bad signature, or unknown subject
    #[error("Invalid token")]
    TokenInvalid,

    /// Token signature is fine but its expiry has passed
    #[error("Token expired")]
    TokenExpired,

    /// Missing or malformed authorization header
    #[error("Missing authorization header")]
    MissingAuth,
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DbError {
    /// SQLite error
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The background connection thread is gone
    #[error("Connection error: {0}")]
    Connection(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<tokio_rusqlite::Error> for DbError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        match err {
            tokio_rusqlite::Error::Rusqlite(e) => DbError::Sqlite(e),
            other => DbError::Connection(other.to_string()),
        }
    }
}

/// Field validation errors raised when building records
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty or only whitespace
    #[error("Username must not be empty")]
    EmptyUsername,

    /// Password is empty
    #[error("Password must not be empty")]
    EmptyPassword,

    /// Password hash is empty
    #[error("Password hash must not be empty")]
    EmptyPasswordHash,
}

/// Application-level error type
///
/// This is the main error type used throughout the application.
/// It aggregates all domain-specific error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
