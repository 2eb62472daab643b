//! The session store: in-memory state with write-through persistence

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::{broadcast, RwLock};

use crate::storage::{keys, CredentialStorage};
use crate::types::{Session, User, UserPatch};
use crate::{AuthError, TokenProvider};

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: u64 },
    SignedOut,
    TokenRefreshed,
    UserUpdated { user_id: u64 },
}

/// Single source of truth for the logged-in identity.
///
/// Construct one per application (usually via [`SessionStore::restore`])
/// and share it behind an `Arc`. Every mutation updates memory and storage
/// while holding the write lock, with no await point in between.
pub struct SessionStore {
    storage: Arc<dyn CredentialStorage>,
    state: RwLock<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Create an empty, logged-out store without reading storage
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self::with_session(storage, Session::default())
    }

    /// Create a store from whatever the storage holds.
    ///
    /// A token together with a parseable user record yields an authenticated
    /// store. Anything else (missing fields, an unparsable user, a storage
    /// read error) yields a logged-out store and the leftovers are removed.
    pub fn restore(storage: Arc<dyn CredentialStorage>) -> Self {
        let session = match read_persisted(storage.as_ref()) {
            Ok(Some(session)) => {
                if let Some(user) = &session.user {
                    info!("Restored session for user {}", user.id);
                }
                session
            }
            Ok(None) => {
                discard_persisted(storage.as_ref());
                Session::default()
            }
            Err(err) => {
                warn!("Discarding unreadable persisted session: {}", err);
                discard_persisted(storage.as_ref());
                Session::default()
            }
        };
        Self::with_session(storage, session)
    }

    fn with_session(storage: Arc<dyn CredentialStorage>, session: Session) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            state: RwLock::new(session),
            events,
        }
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// A copy of the current session
    pub async fn session(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Install a new identity and persist it.
    ///
    /// If persisting fails the store ends up logged out, in memory and on
    /// storage, and the error is returned.
    pub async fn login(
        &self,
        user: User,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Result<(), AuthError> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        let user_id = user.id;

        {
            let mut state = self.state.write().await;
            if let Err(err) =
                persist_credentials(self.storage.as_ref(), &user, &access_token, &refresh_token)
            {
                warn!("Failed to persist session for user {}: {}", user_id, err);
                discard_persisted(self.storage.as_ref());
                *state = Session::default();
                return Err(err);
            }
            *state = Session {
                user: Some(user),
                access_token: Some(access_token),
                refresh_token: Some(refresh_token),
            };
        }

        info!("Signed in user {}", user_id);
        self.emit(SessionEvent::SignedIn { user_id });
        Ok(())
    }

    /// Clear the session in memory and on storage. Safe to call repeatedly.
    pub async fn logout(&self) {
        let was_signed_in = {
            let mut state = self.state.write().await;
            let was_signed_in = state.user.is_some()
                || state.access_token.is_some()
                || state.refresh_token.is_some();
            *state = Session::default();
            discard_persisted(self.storage.as_ref());
            was_signed_in
        };

        if was_signed_in {
            info!("Signed out");
            self.emit(SessionEvent::SignedOut);
        }
    }

    /// Merge `patch` into the current user and persist the result.
    ///
    /// Returns `Ok(None)` without touching anything when logged out.
    pub async fn update_user(&self, patch: UserPatch) -> Result<Option<User>, AuthError> {
        let merged = {
            let mut state = self.state.write().await;
            let Some(current) = state.user.as_ref() else {
                warn!("update_user called without a session; ignoring");
                return Ok(None);
            };

            let mut merged = current.clone();
            merged.merge(&patch);
            let raw = serde_json::to_string(&merged)?;
            self.storage.set(keys::USER, &raw)?;
            state.user = Some(merged.clone());
            merged
        };

        debug!("Updated user {}", merged.id);
        self.emit(SessionEvent::UserUpdated { user_id: merged.id });
        Ok(Some(merged))
    }

    /// Remember (or forget, with `None`) the email to prefill on the login form
    pub fn remember_email(&self, email: Option<&str>) -> Result<(), AuthError> {
        match email {
            Some(email) => {
                self.storage.set(keys::REMEMBER_ME, "true")?;
                self.storage.set(keys::USER_EMAIL, email)?;
            }
            None => {
                self.storage.remove(keys::REMEMBER_ME)?;
                self.storage.remove(keys::USER_EMAIL)?;
            }
        }
        Ok(())
    }

    /// The remembered login email, if the user opted in
    pub fn remembered_email(&self) -> Option<String> {
        let read = || -> Result<Option<String>, AuthError> {
            if self.storage.get(keys::REMEMBER_ME)?.as_deref() != Some("true") {
                return Ok(None);
            }
            self.storage.get(keys::USER_EMAIL)
        };
        match read() {
            Ok(email) => email,
            Err(err) => {
                debug!("Could not read remembered email: {}", err);
                None
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl TokenProvider for SessionStore {
    async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    async fn set_access_token(&self, token: String) -> Result<(), AuthError> {
        {
            let mut state = self.state.write().await;
            if state.user.is_none() {
                return Err(AuthError::MissingSession);
            }
            self.storage.set(keys::ACCESS_TOKEN, &token)?;
            state.access_token = Some(token);
        }

        debug!("Access token refreshed");
        self.emit(SessionEvent::TokenRefreshed);
        Ok(())
    }

    async fn clear(&self) {
        self.logout().await;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn read_persisted(storage: &dyn CredentialStorage) -> Result<Option<Session>, AuthError> {
    let access_token = non_empty(storage.get(keys::ACCESS_TOKEN)?);
    let raw_user = non_empty(storage.get(keys::USER)?);

    let (Some(access_token), Some(raw_user)) = (access_token, raw_user) else {
        return Ok(None);
    };

    let user: User = serde_json::from_str(&raw_user)?;
    let refresh_token = non_empty(storage.get(keys::REFRESH_TOKEN)?);

    Ok(Some(Session {
        user: Some(user),
        access_token: Some(access_token),
        refresh_token,
    }))
}

fn persist_credentials(
    storage: &dyn CredentialStorage,
    user: &User,
    access_token: &str,
    refresh_token: &str,
) -> Result<(), AuthError> {
    let raw_user = serde_json::to_string(user)?;
    storage.set(keys::USER, &raw_user)?;
    storage.set(keys::ACCESS_TOKEN, access_token)?;
    storage.set(keys::REFRESH_TOKEN, refresh_token)?;
    Ok(())
}

fn discard_persisted(storage: &dyn CredentialStorage) {
    for key in [keys::USER, keys::ACCESS_TOKEN, keys::REFRESH_TOKEN] {
        if let Err(err) = storage.remove(key) {
            warn!("Failed to remove {} from storage: {}", key, err);
        }
    }
}
