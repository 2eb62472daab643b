//! Field presence and format checks done before a form is sent

use std::collections::BTreeMap;
use std::fmt;

use fasil360_auth::UserPatch;

use super::types::RegistrationForm;

const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error; the first error for a field wins
    pub fn add(&mut self, field: &str, message: &str) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> crate::error::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(crate::error::Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            let field: String = field.into();
            let message: String = message.into();
            errors.add(&field, &message);
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Score a password on length, upper case, lower case, digits and symbols
pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
    ];
    match checks.iter().filter(|passed| **passed).count() {
        4.. => PasswordStrength::Strong,
        3 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    }
}

/// Loose `x@y.z` shape check
pub fn looks_like_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !looks_like_email(email) {
        errors.add("email", "Email is invalid");
    }
}

fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

pub fn validate_login(email: &str, password: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors
}

pub fn validate_registration(form: &RegistrationForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let username = form.username.trim();
    if username.is_empty() {
        errors.add("username", "Username is required");
    } else if username.chars().count() < 3 {
        errors.add("username", "Username must be at least 3 characters");
    }

    check_email(&mut errors, &form.email);

    if form.password.is_empty() {
        errors.add("password", "Password is required");
    } else if form.password.chars().count() < 8 {
        errors.add("password", "Password must be at least 8 characters");
    } else if password_strength(&form.password) == PasswordStrength::Weak {
        errors.add("password", "Password is too weak");
    }

    if form.password2.is_empty() {
        errors.add("password2", "Please confirm your password");
    } else if form.password != form.password2 {
        errors.add("password2", "Passwords do not match");
    }

    require(&mut errors, "first_name", &form.first_name, "First name is required");
    require(&mut errors, "last_name", &form.last_name, "Last name is required");
    require(&mut errors, "department", &form.department, "Department is required");
    require(&mut errors, "campus", &form.campus, "Campus is required");
    require(&mut errors, "batch", &form.batch, "Batch is required");

    errors
}

/// Only the fields present in the patch are checked
pub fn validate_profile_patch(patch: &UserPatch) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if let Some(first_name) = &patch.first_name {
        require(&mut errors, "first_name", first_name, "First name is required");
    }
    if let Some(last_name) = &patch.last_name {
        require(&mut errors, "last_name", last_name, "Last name is required");
    }
    if let Some(username) = &patch.username {
        require(&mut errors, "username", username, "Username is required");
    }
    if let Some(email) = &patch.email {
        check_email(&mut errors, email);
    }
    errors
}
