//! External auth provider capability.
//!
//! The provider issues and validates sessions; the gate only consumes it
//! through [`AuthProvider`]. One configured client is built at startup and
//! handed to the components that need it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::admin::model::Credentials;

pub mod bridge;
pub mod gotrue;
pub mod memory;

pub use bridge::{Attempt, AuthProviderBridge, EstablishPath, Established};
pub use gotrue::GoTrueProvider;
pub use memory::MemoryProvider;

/// Provider account attached to a session.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Provider-issued session. Opaque to the gate apart from the access token
/// and the bound email.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: ProviderUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    Established(Session),
    /// The provider refused these credentials: no such account, or the
    /// account has a different password.
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUp {
    Created,
    AlreadyRegistered,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Unexpected { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp, ProviderError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    /// Account behind an access token, or `None` when the token is unknown,
    /// expired or revoked.
    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, ProviderError>;
}
