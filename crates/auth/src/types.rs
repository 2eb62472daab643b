//! Types for the logged-in identity

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reads an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// User record as returned by the backend's login, register and profile endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: u64,

    /// The user's email address
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub campus: String,

    /// Cohort the user belongs to, e.g. "GC 2026"
    #[serde(default, deserialize_with = "null_as_default")]
    pub batch: String,

    /// Whether the user may upload content for their batch
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_representative: bool,

    /// Whether the user is an administrator
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_staff: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// Fields the backend sends that this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// "First Last", falling back to the username when both names are blank
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Shallow merge: every field present in `patch` replaces the current value
    pub fn merge(&mut self, patch: &UserPatch) {
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(department) = &patch.department {
            self.department = department.clone();
        }
        if let Some(campus) = &patch.campus {
            self.campus = campus.clone();
        }
        if let Some(batch) = &patch.batch {
            self.batch = batch.clone();
        }
        if let Some(is_representative) = patch.is_representative {
            self.is_representative = is_representative;
        }
        if let Some(is_staff) = patch.is_staff {
            self.is_staff = is_staff;
        }
        if let Some(bio) = &patch.bio {
            self.bio = Some(bio.clone());
        }
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Partial user record. Absent fields are left untouched by [`User::merge`]
/// and are not sent when the patch is serialized for `PATCH /users/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_representative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn department(mut self, value: impl Into<String>) -> Self {
        self.department = Some(value.into());
        self
    }

    pub fn campus(mut self, value: impl Into<String>) -> Self {
        self.campus = Some(value.into());
        self
    }

    pub fn batch(mut self, value: impl Into<String>) -> Self {
        self.batch = Some(value.into());
        self
    }

    pub fn bio(mut self, value: impl Into<String>) -> Self {
        self.bio = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<User> for UserPatch {
    fn from(user: User) -> Self {
        Self {
            email: Some(user.email),
            username: Some(user.username),
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            department: Some(user.department),
            campus: Some(user.campus),
            batch: Some(user.batch),
            is_representative: Some(user.is_representative),
            is_staff: Some(user.is_staff),
            bio: user.bio,
            extra: user.extra,
        }
    }
}

/// Snapshot of the session held by the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }
}
