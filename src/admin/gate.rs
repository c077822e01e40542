//! The admin gate: one place that owns both identity stores.
//!
//! Flow Overview:
//! - Login: Credential Verifier, then Auth Provider Bridge.
//! - Registration: hash, insert the row, then create the provider account; a
//!   failed provider sign-up removes the row again so the two stores do not
//!   drift apart. A provider account that already exists must accept the new
//!   password, otherwise registration fails the same way.
//! - Protected requests: Route Guard over the Session Accessor.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{
    accessor::SessionAccessor,
    email::valid_email,
    error::AuthError,
    guard::{GuardState, RouteGuard},
    model::{AdminProfile, Credentials, NewAdministrator, Registration, ADMIN_ROLE},
    password::{hash_password_blocking, DEFAULT_COST, MAX_PASSWORD_BYTES},
    store::{AdminStore, InsertOutcome},
    verifier::CredentialVerifier,
};
use crate::provider::{
    Attempt, AuthProvider, AuthProviderBridge, EstablishPath, Established, Session, SignUp,
};

const DEFAULT_LOGIN_PATH: &str = "/admin/login";
const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60;

#[derive(Clone, Debug)]
pub struct GateConfig {
    bcrypt_cost: u32,
    login_path: String,
    session_cookie_secure: bool,
    session_ttl_seconds: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GateConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            session_cookie_secure: false,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: String) -> Self {
        self.login_path = path;
        self
    }

    #[must_use]
    pub fn with_session_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    /// Cookie lifetime used when the provider does not report one.
    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }
}

/// Successful login: the administrator plus the provider session.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub user: AdminProfile,
    pub session: Session,
    pub path: EstablishPath,
}

pub struct AdminGate {
    config: GateConfig,
    store: Arc<dyn AdminStore>,
    bridge: AuthProviderBridge,
    verifier: CredentialVerifier,
    guard: RouteGuard,
}

impl AdminGate {
    /// Wire the gate from its two collaborators.
    ///
    /// # Errors
    /// Returns an error if the configured bcrypt cost is not usable.
    pub fn new(
        config: GateConfig,
        store: Arc<dyn AdminStore>,
        provider: Arc<dyn AuthProvider>,
    ) -> Result<Self> {
        let bridge = AuthProviderBridge::new(provider);
        let verifier = CredentialVerifier::new(store.clone(), config.bcrypt_cost())?;
        let accessor = SessionAccessor::new(bridge.clone(), store.clone());
        let guard = RouteGuard::new(accessor, bridge.clone(), config.login_path());

        Ok(Self {
            config,
            store,
            bridge,
            verifier,
            guard,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Verify the password against the store, then establish a provider
    /// session (creating the provider account if it is missing).
    ///
    /// # Errors
    /// `InvalidCredentials`, `StoreUnavailable` or `AuthProvisioningFailed`.
    #[instrument(skip_all, fields(email = credentials.email()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let user = self.verifier.verify(credentials).await?;
        let Established { session, path } = self.bridge.establish(credentials).await?;

        info!(admin_id = %user.id, ?path, "administrator logged in");

        Ok(LoginGrant {
            user,
            session,
            path,
        })
    }

    /// Create an administrator and the matching provider account.
    ///
    /// # Errors
    /// `InvalidRequest` for bad input, `AlreadyRegistered` for a taken email,
    /// `StoreUnavailable` or `AuthProvisioningFailed` when a store write fails.
    #[instrument(skip_all, fields(email = registration.credentials.email()))]
    pub async fn register(&self, registration: Registration) -> Result<AdminProfile, AuthError> {
        let Registration { credentials, name } = registration;

        if !valid_email(credentials.email()) {
            return Err(AuthError::InvalidRequest("Invalid email".to_string()));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidRequest("Missing name".to_string()));
        }

        if credentials.password_is_empty() {
            return Err(AuthError::InvalidRequest("Missing password".to_string()));
        }

        if credentials.password_len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::InvalidRequest(format!(
                "Password longer than {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        let password_hash =
            hash_password_blocking(credentials.password().clone(), self.config.bcrypt_cost())
                .await?;

        let outcome = self
            .store
            .insert(NewAdministrator {
                email: credentials.email().to_string(),
                name: name.to_string(),
                role: ADMIN_ROLE.to_string(),
                password_hash,
            })
            .await
            .map_err(AuthError::store)?;

        let profile = match outcome {
            InsertOutcome::Inserted(profile) => profile,
            InsertOutcome::EmailTaken => return Err(AuthError::AlreadyRegistered),
        };

        if let Err(err) = self.provision(&credentials).await {
            if let Err(remove_err) = self.store.remove(profile.id).await {
                error!(
                    admin_id = %profile.id,
                    "Failed to remove administrator after provider sign-up failed: {remove_err:#}"
                );
            }
            return Err(err);
        }

        info!(admin_id = %profile.id, "administrator registered");

        Ok(profile)
    }

    /// Sign up at the provider. An existing provider account only counts when
    /// it accepts these credentials. The session opened to check that is
    /// signed out again.
    async fn provision(&self, credentials: &Credentials) -> Result<(), AuthError> {
        if self.bridge.provision(credentials).await? == SignUp::Created {
            return Ok(());
        }

        match self.bridge.attempt(credentials).await {
            Attempt::Established(session) => {
                if let Err(err) = self.bridge.sign_out(&session.access_token).await {
                    warn!("Failed to sign out registration check session: {err}");
                }
                Ok(())
            }
            Attempt::NeedsProvisioning => {
                warn!("provider account exists with a different password");
                Err(AuthError::AuthProvisioningFailed(
                    "provider account does not accept these credentials".to_string(),
                ))
            }
            Attempt::Failed(reason) => Err(AuthError::AuthProvisioningFailed(reason)),
        }
    }

    pub async fn current_admin(&self, access_token: Option<&str>) -> Option<AdminProfile> {
        match self.guard.check(access_token).await {
            GuardState::Authorized(profile) => Some(profile),
            _ => None,
        }
    }

    pub async fn logout(&self, access_token: Option<&str>) -> GuardState {
        self.guard.logout(access_token).await
    }

    /// Reachability of the administrator store.
    ///
    /// # Errors
    /// Returns the store error.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}
