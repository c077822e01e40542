//! Credential Verifier: checks an email/password pair against the
//! administrator store.

use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    error::AuthError,
    model::{AdminProfile, Credentials},
    password::{hash_password, verify_password_blocking},
    store::AdminStore,
};

#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn AdminStore>,
    // Verified against when the email is unknown, so both failure cases cost
    // one bcrypt verification.
    decoy_hash: Arc<str>,
}

impl CredentialVerifier {
    /// # Errors
    /// Returns an error if the decoy hash cannot be computed for `cost`.
    pub fn new(store: Arc<dyn AdminStore>, cost: u32) -> Result<Self> {
        let decoy = hash_password(&SecretString::from("tripgate-decoy".to_string()), cost)?;
        Ok(Self {
            store,
            decoy_hash: Arc::from(decoy),
        })
    }

    /// Return the administrator's public fields when the password matches.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown email or a wrong password,
    /// `StoreUnavailable` when the lookup fails.
    #[instrument(skip_all, fields(email = credentials.email()))]
    pub async fn verify(&self, credentials: &Credentials) -> Result<AdminProfile, AuthError> {
        let admin = self
            .store
            .find_by_email(credentials.email())
            .await
            .map_err(AuthError::store)?;

        let Some(admin) = admin else {
            verify_password_blocking(credentials.password().clone(), self.decoy_hash.to_string())
                .await?;
            debug!("administrator not found");
            return Err(AuthError::InvalidCredentials);
        };

        let matches =
            verify_password_blocking(credentials.password().clone(), admin.password_hash.clone())
                .await?;

        if !matches {
            debug!("password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(admin.profile())
    }
}
