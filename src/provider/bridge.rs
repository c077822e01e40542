//! Auth Provider Bridge: turns a verified administrator into a provider
//! session, creating the provider account on first login.
//!
//! Flow Overview:
//! 1) Sign in. A session ends the flow (direct path, no sign-up).
//! 2) A refusal means the provider account is missing: sign up.
//! 3) Sign in exactly once more. Anything but a session is a provisioning
//!    failure.
//!
//! Steps run sequentially with no locking. Two first logins for the same email
//! may both sign up; the loser sees `AlreadyRegistered` and still gets its one
//! follow-up sign-in.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{AuthProvider, ProviderError, ProviderUser, Session, SignIn, SignUp};
use crate::admin::{error::AuthError, model::Credentials};

/// Result of a single sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Established(Session),
    NeedsProvisioning,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstablishPath {
    /// The provider account already existed.
    Direct,
    /// The provider account was created during this login.
    Provisioned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Established {
    pub session: Session,
    pub path: EstablishPath,
}

#[derive(Clone)]
pub struct AuthProviderBridge {
    provider: Arc<dyn AuthProvider>,
}

impl AuthProviderBridge {
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    /// One sign-in call, classified.
    pub async fn attempt(&self, credentials: &Credentials) -> Attempt {
        match self.provider.sign_in(credentials).await {
            Ok(SignIn::Established(session)) => Attempt::Established(session),
            Ok(SignIn::Rejected(reason)) => {
                debug!("provider refused sign in: {reason}");
                Attempt::NeedsProvisioning
            }
            Err(err) => Attempt::Failed(err.to_string()),
        }
    }

    /// Obtain a provider session for credentials already checked against the
    /// administrator store.
    ///
    /// # Errors
    /// Returns `AuthProvisioningFailed` when no session can be established.
    #[instrument(skip_all, fields(email = credentials.email()))]
    pub async fn establish(&self, credentials: &Credentials) -> Result<Established, AuthError> {
        match self.attempt(credentials).await {
            Attempt::Established(session) => {
                return Ok(Established {
                    session,
                    path: EstablishPath::Direct,
                })
            }
            Attempt::Failed(reason) => return Err(AuthError::AuthProvisioningFailed(reason)),
            Attempt::NeedsProvisioning => (),
        }

        let sign_up = self
            .provider
            .sign_up(credentials)
            .await
            .map_err(|err| AuthError::AuthProvisioningFailed(err.to_string()))?;

        match self.attempt(credentials).await {
            Attempt::Established(session) => {
                info!("provisioned provider account");
                Ok(Established {
                    session,
                    path: EstablishPath::Provisioned,
                })
            }
            Attempt::NeedsProvisioning if sign_up == SignUp::AlreadyRegistered => {
                warn!("provider account exists with a different password");
                Err(AuthError::AuthProvisioningFailed(
                    "provider account does not accept these credentials".to_string(),
                ))
            }
            Attempt::NeedsProvisioning => Err(AuthError::AuthProvisioningFailed(
                "sign in refused after sign up".to_string(),
            )),
            Attempt::Failed(reason) => Err(AuthError::AuthProvisioningFailed(reason)),
        }
    }

    /// Create the provider account for a new administrator. An account that
    /// already exists is reported, not treated as an error.
    ///
    /// # Errors
    /// Returns `AuthProvisioningFailed` if the provider rejects the sign-up.
    #[instrument(skip_all, fields(email = credentials.email()))]
    pub async fn provision(&self, credentials: &Credentials) -> Result<SignUp, AuthError> {
        let outcome = self
            .provider
            .sign_up(credentials)
            .await
            .map_err(|err| AuthError::AuthProvisioningFailed(err.to_string()))?;

        if outcome == SignUp::AlreadyRegistered {
            debug!("provider account already present");
        }

        Ok(outcome)
    }

    /// Revoke a provider session.
    ///
    /// # Errors
    /// Returns the provider error unchanged.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.provider.sign_out(access_token).await
    }

    /// Account behind an access token.
    ///
    /// # Errors
    /// Returns the provider error unchanged.
    pub async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, ProviderError> {
        self.provider.current_user(access_token).await
    }
}
