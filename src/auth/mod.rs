//! Login, registration and profile management

mod types;
mod validation;

use std::sync::Arc;

use fasil360_auth::{AuthError, SessionStore, User, UserPatch};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fetch::ApiRequest;
use crate::gateway::ApiClient;

pub use types::*;
pub use validation::*;

/// Client for authentication and the current user's profile
pub struct AuthApi {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
}

impl AuthApi {
    pub(crate) fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Sign in with email and password and store the session
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        validate_login(email, password).into_result()?;

        let request = ApiRequest::post("/users/login/").json(&LoginRequest { email, password })?;
        let response: AuthResponse = self.api.send_json(request).await?;
        self.start_session(response).await
    }

    /// Sign in, then remember or forget the email for the next login form
    pub async fn login_remembering(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<User> {
        let user = self.login(email, password).await?;
        let remembered = remember.then(|| email.trim());
        self.session.remember_email(remembered)?;
        Ok(user)
    }

    /// Create an account and sign straight in
    pub async fn register(&self, form: &RegistrationForm) -> Result<User> {
        validate_registration(form).into_result()?;

        let request = ApiRequest::post("/users/register/").json(form)?;
        let response: AuthResponse = self.api.send_json(request).await?;
        self.start_session(response).await
    }

    /// Forget the session locally; the backend keeps no server-side session
    pub async fn logout(&self) {
        self.session.logout().await;
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.user().await
    }

    /// Patch the current user's profile and merge the backend's answer into the session
    pub async fn update_profile(&self, patch: UserPatch) -> Result<User> {
        validate_profile_patch(&patch).into_result()?;
        let current = self.require_user().await?;

        let request = ApiRequest::patch(format!("/users/{}/", current.id)).json(&patch)?;
        let updated: User = self.api.send_json(request).await?;
        self.merge_into_session(updated).await
    }

    /// Reload the current user from the backend, e.g. after a role change
    pub async fn refresh_user(&self) -> Result<User> {
        let current = self.require_user().await?;

        let request = ApiRequest::get(format!("/users/{}/", current.id));
        let fresh: User = self.api.send_json(request).await?;
        self.merge_into_session(fresh).await
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.session.remembered_email()
    }

    async fn start_session(&self, response: AuthResponse) -> Result<User> {
        let AuthResponse {
            user,
            access,
            refresh,
        } = response;
        if access.is_empty() {
            return Err(Error::invalid_response("no access token in auth response"));
        }

        info!("Signed in as user {}", user.id);
        self.session.login(user.clone(), access, refresh).await?;
        Ok(user)
    }

    async fn require_user(&self) -> Result<User> {
        self.session
            .user()
            .await
            .ok_or(Error::Auth(AuthError::MissingSession))
    }

    async fn merge_into_session(&self, user: User) -> Result<User> {
        debug!("Merging user {} into the session", user.id);
        self.session
            .update_user(UserPatch::from(user))
            .await?
            .ok_or(Error::Auth(AuthError::MissingSession))
    }
}
