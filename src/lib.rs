//! Fasil 360 Rust Client Library
//!
//! A Rust client for the Fasil 360 campus platform API, providing access to
//! authentication, photos, rewards, documents, comments, representative
//! requests and search.
//!
//! All sub-clients share one [`gateway::ApiClient`], which attaches the
//! current access token to every request and renews it once on a 401.
//! The session itself lives in a [`SessionStore`] backed by a
//! [`CredentialStorage`], so a restarted application picks up where it left off.

pub mod auth;
pub mod comments;
pub mod config;
pub mod content;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod listing;
pub mod representatives;
pub mod search;

use std::sync::Arc;

pub use fasil360_auth::{
    keys, AuthError, CredentialStorage, FileStorage, MemoryStorage, Session, SessionEvent,
    SessionStore, TokenProvider, User, UserPatch,
};

use crate::auth::AuthApi;
use crate::comments::CommentsApi;
use crate::config::ClientOptions;
use crate::content::{CategoriesApi, DocumentsApi, PhotosApi, RewardsApi};
use crate::error::Result;
use crate::gateway::ApiClient;
use crate::representatives::RepresentativeRequestsApi;
use crate::search::SearchApi;

/// The main entry point for the Fasil 360 client
pub struct Fasil360 {
    options: ClientOptions,
    session: Arc<SessionStore>,
    api: Arc<ApiClient>,
}

impl Fasil360 {
    /// Create a client, restoring any session persisted in `storage`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use fasil360::{Fasil360, MemoryStorage, config::ClientOptions};
    ///
    /// let client = Fasil360::new(
    ///     ClientOptions::new("http://localhost:8000/api"),
    ///     Arc::new(MemoryStorage::new()),
    /// )
    /// .unwrap();
    /// ```
    pub fn new(options: ClientOptions, storage: Arc<dyn CredentialStorage>) -> Result<Self> {
        let session = Arc::new(SessionStore::restore(storage));
        Self::with_session(options, session)
    }

    /// Create a client around an existing session store
    pub fn with_session(options: ClientOptions, session: Arc<SessionStore>) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&options, session.clone())?);
        Ok(Self {
            options,
            session,
            api,
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The shared gateway, for endpoints without a dedicated sub-client
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.api.clone(), self.session.clone())
    }

    pub fn photos(&self) -> PhotosApi {
        PhotosApi::new(self.api.clone())
    }

    pub fn rewards(&self) -> RewardsApi {
        RewardsApi::new(self.api.clone())
    }

    pub fn documents(&self) -> DocumentsApi {
        DocumentsApi::new(self.api.clone())
    }

    pub fn categories(&self) -> CategoriesApi {
        CategoriesApi::new(self.api.clone())
    }

    pub fn comments(&self) -> CommentsApi {
        CommentsApi::new(
            self.api.clone(),
            self.options.comment_content_types.clone(),
        )
    }

    pub fn representative_requests(&self) -> RepresentativeRequestsApi {
        RepresentativeRequestsApi::new(self.api.clone())
    }

    pub fn search(&self) -> SearchApi {
        SearchApi::new(self.api.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, Environment};
    pub use crate::error::{Error, Result};
    pub use crate::gateway::ClientEvent;
    pub use crate::Fasil360;
    pub use fasil360_auth::{CredentialStorage, FileStorage, MemoryStorage, SessionStore, User};
}
