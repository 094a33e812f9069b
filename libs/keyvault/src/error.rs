//! Error types for the Key Vault client
//!
//! Every secret operation fails with a [`KeyVaultError`], whatever went wrong
//! underneath. The set of [`ErrorCode`]s is closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed set of error codes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Catch-all, including undecodable backend responses
    InternalServerError,
    NotFound,
    Unauthorized,
    InsufficientAccess,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InsufficientAccess => "INSUFFICIENT_ACCESS",
        }
    }

    /// HTTP status reported together with the code
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::InternalServerError => 500,
            ErrorCode::NotFound => 404,
            ErrorCode::Unauthorized => 401,
            ErrorCode::InsufficientAccess => 403,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized error returned by every secret operation
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("Code: {code}, Status: {status}, Message: {message}, TraceId: {trace_id}")]
pub struct KeyVaultError {
    code: ErrorCode,
    status: u16,
    message: String,
    trace_id: String,
}

impl KeyVaultError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: code.status(),
            message: message.into(),
            trace_id: String::new(),
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalServerError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn insufficient_access(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientAccess, message)
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Replaces the message, keeping code, status and trace id
    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

/// A batch of errors, serialized as `{"errors": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorList {
    pub errors: Vec<KeyVaultError>,
}

impl From<Vec<KeyVaultError>> for ErrorList {
    fn from(errors: Vec<KeyVaultError>) -> Self {
        Self { errors }
    }
}
