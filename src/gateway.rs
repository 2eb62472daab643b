//! The API gateway: the one channel between the application and the backend
//!
//! Every request gets the current access token attached. A 401 triggers at
//! most one refresh-and-replay per request; when the refresh cannot happen
//! the credentials are cleared and [`ClientEvent::LoginRequired`] is
//! broadcast so the UI can route to the login view.

use std::sync::Arc;

use fasil360_auth::TokenProvider;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::config::ClientOptions;
use crate::content::Listing;
use crate::error::{Error, Result};
use crate::fetch::{ApiRequest, PendingRequest};

const EVENT_CAPACITY: usize = 16;

/// Side effects the UI is expected to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Credentials are gone and could not be renewed; show the login view
    LoginRequired,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// HTTP client with bearer decoration and the refresh-on-401 protocol
pub struct ApiClient {
    http: Client,
    base_url: String,
    token_refresh_url: String,
    tokens: Arc<dyn TokenProvider>,
    /// Serializes refreshes so concurrent 401s share one refresh call
    refresh_gate: Mutex<()>,
    events: broadcast::Sender<ClientEvent>,
}

impl ApiClient {
    /// Create a gateway reading credentials from `tokens`
    pub fn new(options: &ClientOptions, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        options.validate()?;

        let http = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(options.user_agent.clone())
            .build()?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token_refresh_url: options.token_refresh_url.clone(),
            tokens,
            refresh_gate: Mutex::new(()),
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subscribe to navigation side effects
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Send a request and return the successful response.
    ///
    /// Non-2xx answers become [`Error::Api`]. A 401 is retried once after a
    /// successful token refresh; if the refresh is impossible or fails, the
    /// session is cleared and the original 401 is returned.
    pub async fn send(&self, request: ApiRequest) -> Result<Response> {
        let mut pending = PendingRequest::new(request);

        loop {
            let token = self.tokens.access_token().await;
            let response = self.dispatch(&pending, token.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED || pending.already_retried {
                return Self::check(response).await;
            }

            let original = Self::into_error(response).await;
            pending.already_retried = true;

            if !self.renew_access_token(token.as_deref()).await {
                return Err(original);
            }
            debug!(
                "Replaying {} {} with a refreshed token",
                pending.request.method(),
                pending.request.path()
            );
        }
    }

    /// Send a request and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request and decode the JSON body, `None` when the body is empty
    pub async fn send_optional_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Send a request for a collection, paginated or not
    pub async fn send_listing<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Vec<T>> {
        let listing: Listing<T> = self.send_json(request).await?;
        Ok(listing.into_vec())
    }

    /// Send a request and discard the body
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await?;
        Ok(())
    }

    async fn dispatch(&self, pending: &PendingRequest, token: Option<&str>) -> Result<Response> {
        let request = &pending.request;
        debug!(
            "API request {} {} (retry: {})",
            request.method(),
            request.path(),
            pending.already_retried
        );

        let response = request
            .build(&self.http, &self.base_url, token)?
            .send()
            .await?;

        debug!("API response {} {}", response.status(), request.path());
        Ok(response)
    }

    /// Make sure a usable access token exists after a 401, or end the session.
    ///
    /// `stale` is the token the failed request carried. The whole decision,
    /// including clearing credentials on failure, happens under the refresh
    /// gate, so a waiter sees either the new token or the cleared session.
    async fn renew_access_token(&self, stale: Option<&str>) -> bool {
        let _gate = self.refresh_gate.lock().await;

        let current = self.tokens.access_token().await;
        if current.is_some() && current.as_deref() != stale {
            debug!("Access token already refreshed by a concurrent request");
            return true;
        }
        if current.is_none() && stale.is_some() {
            debug!("Session already cleared by a concurrent request");
            return false;
        }

        if self.refresh_access_token().await {
            true
        } else {
            self.force_login().await;
            false
        }
    }

    async fn refresh_access_token(&self) -> bool {
        let Some(refresh_token) = self.tokens.refresh_token().await else {
            warn!("Received 401 without a refresh token");
            return false;
        };

        match self.request_access_token(&refresh_token).await {
            Ok(access) => match self.tokens.set_access_token(access).await {
                Ok(()) => {
                    info!("Access token refreshed");
                    true
                }
                Err(err) => {
                    warn!("Could not store refreshed token: {}", err);
                    false
                }
            },
            Err(err) => {
                warn!("Token refresh failed: {}", err);
                false
            }
        }
    }

    /// POST the refresh token to the refresh endpoint, without bearer decoration
    async fn request_access_token(&self, refresh_token: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.token_refresh_url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;

        let response = Self::check(response).await?;
        let body: RefreshResponse = response.json().await?;
        if body.access.is_empty() {
            return Err(Error::invalid_response("refresh returned an empty access token"));
        }
        Ok(body.access)
    }

    async fn force_login(&self) {
        warn!("Session expired; clearing credentials");
        self.tokens.clear().await;
        // No subscribers is fine.
        let _ = self.events.send(ClientEvent::LoginRequired);
    }

    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::into_error(response).await)
        }
    }

    async fn into_error(response: Response) -> Error {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        debug!("API error {}: {}", status, message);
        Error::Api { status, message }
    }
}
