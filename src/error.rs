//! Error handling for the Fasil 360 client

use std::fmt;
use thiserror::Error;

use crate::auth::ValidationErrors;

/// Unified error type for the Fasil 360 client
#[derive(Error, Debug)]
pub enum Error {
    /// Network, timeout or transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status; the body is kept verbatim
    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Session store errors
    #[error("Session error: {0}")]
    Auth(#[from] fasil360_auth::AuthError),

    /// Input rejected before anything was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend answered 2xx with a body this client cannot use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    pub fn invalid_response<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidResponse(msg.to_string())
    }

    /// HTTP status of the failure, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(err) if err.is_timeout())
    }

    /// 5xx answers and transport failures; the caller may offer a manual retry
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
