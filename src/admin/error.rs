use thiserror::Error;

/// Failures of the admin credential gate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are deliberately
    /// indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The auth provider could not establish or create a session.
    #[error("auth provisioning failed: {0}")]
    AuthProvisioningFailed(String),

    #[error("administrator store unavailable")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("administrator already exists")]
    AlreadyRegistered,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl AuthError {
    pub(crate) fn store(err: anyhow::Error) -> Self {
        Self::StoreUnavailable(err)
    }
}
