//! Session Accessor: resolves the provider session carried by a request to an
//! administrator, or to nothing.

use std::sync::Arc;
use tracing::{debug, error};

use super::{model::AdminProfile, store::AdminStore};
use crate::provider::AuthProviderBridge;

#[derive(Clone)]
pub struct SessionAccessor {
    bridge: AuthProviderBridge,
    store: Arc<dyn AdminStore>,
}

impl SessionAccessor {
    #[must_use]
    pub fn new(bridge: AuthProviderBridge, store: Arc<dyn AdminStore>) -> Self {
        Self { bridge, store }
    }

    /// The administrator behind `access_token`.
    ///
    /// Every negative outcome (no token, no provider session, no email on the
    /// session, no matching row, a failing dependency) collapses to `None`.
    pub async fn current_admin(&self, access_token: Option<&str>) -> Option<AdminProfile> {
        let access_token = access_token?;

        let user = match self.bridge.current_user(access_token).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("no provider session");
                return None;
            }
            Err(err) => {
                error!("Failed to resolve provider session: {err}");
                return None;
            }
        };

        let Some(email) = user.email else {
            debug!("provider session has no email");
            return None;
        };

        match self.store.profile_by_email(&email).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                debug!("provider session is not an administrator");
                None
            }
            Err(err) => {
                error!("Failed to lookup administrator: {err:#}");
                None
            }
        }
    }
}
