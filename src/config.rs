//! Configuration options for the Fasil 360 client

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

const DEVELOPMENT_API_URL: &str = "http://localhost:8000/api";
const PRODUCTION_API_URL: &str = "https://uog-fasil-360.onrender.com/api";
const TOKEN_REFRESH_PATH: &str = "/token/refresh/";

/// Deployment the client talks to, chosen at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Development for debug builds, Production for release builds
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    /// The API base URL. A `FASIL360_API_BASE_URL` set at build time wins.
    pub fn api_base_url(&self) -> &'static str {
        if let Some(url) = option_env!("FASIL360_API_BASE_URL") {
            return url;
        }
        match self {
            Environment::Development => DEVELOPMENT_API_URL,
            Environment::Production => PRODUCTION_API_URL,
        }
    }
}

/// Identifier the backend expects in a comment's `content_type` field.
///
/// Depending on the backend schema this is either the numeric id of the
/// content type or its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentTypeRef {
    Id(u32),
    Label(String),
}

/// `content_type` identifiers used when posting comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContentTypes {
    pub photo: ContentTypeRef,
    pub reward: ContentTypeRef,
    pub document: ContentTypeRef,
}

impl Default for CommentContentTypes {
    fn default() -> Self {
        Self {
            photo: ContentTypeRef::Label("photo".to_string()),
            reward: ContentTypeRef::Label("reward".to_string()),
            document: ContentTypeRef::Label("document".to_string()),
        }
    }
}

/// Configuration options for the Fasil 360 client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL every relative request path is appended to
    pub base_url: String,

    /// Absolute URL of the token refresh endpoint
    pub token_refresh_url: String,

    /// The request timeout
    pub request_timeout: Duration,

    /// Identifiers sent as `content_type` when posting comments
    pub comment_content_types: CommentContentTypes,

    /// Sent as the `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::for_environment(Environment::current())
    }
}

impl ClientOptions {
    /// Options pointing at `base_url`, with the refresh endpoint under it
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            token_refresh_url: format!("{}{}", base_url, TOKEN_REFRESH_PATH),
            base_url,
            request_timeout: Duration::from_secs(10),
            comment_content_types: CommentContentTypes::default(),
            user_agent: format!("fasil360-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        Self::new(environment.api_base_url())
    }

    /// Set the absolute token refresh URL
    pub fn with_token_refresh_url(mut self, value: &str) -> Self {
        self.token_refresh_url = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the comment content type identifiers
    pub fn with_comment_content_types(mut self, value: CommentContentTypes) -> Self {
        self.comment_content_types = value;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }

    /// Check the URLs parse and the timeout is usable
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)?;
        Url::parse(&self.token_refresh_url)?;
        if self.request_timeout.is_zero() {
            return Err(Error::config("request_timeout must be greater than zero"));
        }
        Ok(())
    }
}
