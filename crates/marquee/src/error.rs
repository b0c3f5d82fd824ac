//! Error types for the marquee library.
//!
//! This module provides a unified error type with explicit variants for
//! validation, authentication, transport, protocol, input and storage errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for marquee operations.
///
/// Every remote failure is reported through one of these variants so that
/// controllers can turn it into a user-facing notice without inspecting
/// transport details.
#[derive(Debug, Error)]
pub enum Error {
    /// Required fields were missing or malformed; no request was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Authentication errors (missing token, rejected token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-success responses from the catalog service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (invalid URL, identifier, category).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Session slot persistence errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns true when the error means the current session is no longer valid.
    ///
    /// A rejected token must never be retried, so callers end the session
    /// when this returns true.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Protocol(err) => err.is_auth_error(),
            _ => false,
        }
    }

    /// Returns the message to show a user for this error.
    ///
    /// Service-provided messages win; everything else falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(err) => err.to_string(),
            Error::Protocol(ProtocolError {
                message: Some(message),
                ..
            }) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token is held by the session store.
    #[error("not logged in")]
    MissingToken,
}

/// Protocol-level errors from non-success responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub error: Option<String>,
    /// Error message from the service.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// Check if the service reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Submission validation errors, caught before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Several required fields were empty.
    #[error("Please fill all fields")]
    Incomplete,

    /// A numeric field was out of range.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Unknown catalog category.
    #[error("invalid category '{value}': expected Movie or TVShow")]
    Category { value: String },

    /// Invalid identifier.
    #[error("invalid identifier '{value}': {reason}")]
    Id { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Session slot storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The slot held data that could not be decoded.
    #[error("corrupt session slot {path}: {message}")]
    Corrupt { path: String, message: String },

    /// Watching the slot for changes failed.
    #[error("failed to watch {path}: {message}")]
    Watch { path: String, message: String },
}
