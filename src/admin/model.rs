//! Administrator records and the credential pair submitted at login.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role tag written for every administrator created through registration.
pub const ADMIN_ROLE: &str = "admin";

/// Stored administrator row, including the password hash.
#[derive(Clone)]
pub struct Administrator {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
}

impl Administrator {
    /// Public projection; the hash never leaves the gate.
    #[must_use]
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }
}

impl std::fmt::Debug for Administrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Administrator")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("password_hash", &"***")
            .finish()
    }
}

/// Administrator identity as seen by callers.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Row to insert; the password is already hashed.
#[derive(Clone)]
pub struct NewAdministrator {
    pub email: String,
    pub name: String,
    pub role: String,
    pub password_hash: String,
}

impl std::fmt::Debug for NewAdministrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAdministrator")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("password_hash", &"***")
            .finish()
    }
}

/// Email/password pair. The same pair is used against the admin store and
/// the auth provider.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    #[must_use]
    pub fn password_is_empty(&self) -> bool {
        self.password.expose_secret().is_empty()
    }

    /// Password length in bytes, not characters.
    #[must_use]
    pub fn password_len(&self) -> usize {
        self.password.expose_secret().len()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Registration input: credentials plus the display name.
#[derive(Clone, Debug)]
pub struct Registration {
    pub credentials: Credentials,
    pub name: String,
}
