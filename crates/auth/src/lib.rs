//! Fasil 360 session store
//!
//! This crate owns "who is logged in": the current user record and the
//! access/refresh token pair, mirrored into a [`CredentialStorage`] so the
//! session survives restarts.
//!
//! The HTTP layer never touches the store directly. It is handed a
//! [`TokenProvider`], which [`SessionStore`] implements.

mod session;
mod storage;
mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use session::{SessionEvent, SessionStore};
pub use storage::{keys, CredentialStorage, FileStorage, MemoryStorage};
pub use types::{Session, User, UserPatch};

/// Errors raised by the session store and its storage backends
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing session")]
    MissingSession,
}

impl AuthError {
    pub fn storage<T: std::fmt::Display>(msg: T) -> Self {
        AuthError::Storage(msg.to_string())
    }
}

/// Capability the HTTP gateway uses to read and rotate credentials.
///
/// Implemented by [`SessionStore`]; tests can supply their own.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, if any
    async fn access_token(&self) -> Option<String>;

    /// Current refresh token, if any
    async fn refresh_token(&self) -> Option<String>;

    /// Install a freshly minted access token.
    ///
    /// Fails with [`AuthError::MissingSession`] when nobody is logged in,
    /// so a late refresh cannot resurrect a cleared session.
    async fn set_access_token(&self, token: String) -> Result<(), AuthError>;

    /// Drop every credential, equivalent to a logout
    async fn clear(&self);
}
