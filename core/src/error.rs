//! Error types for the bank API client.
//!
//! # Design
//! `NotFound` has its own variant because pages distinguish "this client is
//! gone" from any other failure. Every other non-2xx status lands in `Http`
//! with the raw body kept for `error_message`. `Transport` and `Timeout`
//! cover the cases where no response arrived at all.

use thiserror::Error;

/// Errors produced while talking to the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered 404.
    #[error("resource not found")]
    NotFound { body: String },

    /// The server answered with a non-2xx status other than 404.
    #[error("request failed with status code {status}")]
    Http { status: u16, body: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("network error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Status code of the response that caused this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, if the server answered.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::NotFound { body } | ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Diagnostic bucket for a non-2xx status. Used for logging only; it never
/// changes how an error propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Unprocessable,
    ServerError,
    Other(u16),
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            400 => StatusClass::BadRequest,
            401 => StatusClass::Unauthorized,
            403 => StatusClass::Forbidden,
            404 => StatusClass::NotFound,
            422 => StatusClass::Unprocessable,
            500 => StatusClass::ServerError,
            other => StatusClass::Other(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusClass::BadRequest => "bad request",
            StatusClass::Unauthorized => "unauthorized",
            StatusClass::Forbidden => "forbidden",
            StatusClass::NotFound => "not found",
            StatusClass::Unprocessable => "validation error",
            StatusClass::ServerError => "server error",
            StatusClass::Other(_) => "unexpected status",
        }
    }
}
