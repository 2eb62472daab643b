//! Types for login and registration

use fasil360_auth::User;
use serde::{Deserialize, Serialize};

/// Credentials for `POST /users/login/`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Answer of the login and register endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// The user data
    pub user: User,

    /// The access token
    pub access: String,

    /// The refresh token
    pub refresh: String,
}

/// Fields of the sign-up form
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Confirmation, must equal `password`
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub campus: String,
    /// e.g. "GC 2026"
    pub batch: String,
}
