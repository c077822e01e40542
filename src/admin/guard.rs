//! Route Guard: `Loading -> {Authorized, Redirecting}`.

use tracing::{debug, error};

use super::{accessor::SessionAccessor, model::AdminProfile};
use crate::provider::AuthProviderBridge;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Loading,
    Authorized(AdminProfile),
    Redirecting {
        location: String,
    },
}

impl GuardState {
    /// Apply the Session Accessor's answer. Only `Loading` moves; the other
    /// states are terminal.
    #[must_use]
    pub fn resolve(self, admin: Option<AdminProfile>, login_path: &str) -> Self {
        match self {
            Self::Loading => match admin {
                Some(profile) => Self::Authorized(profile),
                None => Self::Redirecting {
                    location: login_path.to_string(),
                },
            },
            terminal => terminal,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    accessor: SessionAccessor,
    bridge: AuthProviderBridge,
    login_path: String,
}

impl RouteGuard {
    #[must_use]
    pub fn new(
        accessor: SessionAccessor,
        bridge: AuthProviderBridge,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            accessor,
            bridge,
            login_path: login_path.into(),
        }
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Run the accessor for a protected request.
    pub async fn check(&self, access_token: Option<&str>) -> GuardState {
        let admin = self.accessor.current_admin(access_token).await;
        GuardState::Loading.resolve(admin, &self.login_path)
    }

    /// Sign out at the provider, then redirect. A failed sign-out is logged;
    /// the caller is redirected either way.
    pub async fn logout(&self, access_token: Option<&str>) -> GuardState {
        match access_token {
            Some(token) => {
                if let Err(err) = self.bridge.sign_out(token).await {
                    error!("Failed to sign out: {err}");
                }
            }
            None => debug!("logout without a session"),
        }

        GuardState::Redirecting {
            location: self.login_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{
        model::{NewAdministrator, ADMIN_ROLE},
        store::{AdminStore, MemoryAdminStore},
    };
    use crate::provider::MemoryProvider;
    use anyhow::Result;
    use std::sync::Arc;
    use uuid::Uuid;

    fn profile() -> AdminProfile {
        AdminProfile {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            name: "Ada".to_string(),
            role: ADMIN_ROLE.to_string(),
        }
    }

    #[test]
    fn loading_resolves_to_authorized() {
        let admin = profile();
        let state = GuardState::default().resolve(Some(admin.clone()), "/admin/login");
        assert_eq!(state, GuardState::Authorized(admin));
        assert!(state.is_terminal());
    }

    #[test]
    fn loading_resolves_to_redirecting() {
        let state = GuardState::Loading.resolve(None, "/admin/login");
        assert_eq!(
            state,
            GuardState::Redirecting {
                location: "/admin/login".to_string()
            }
        );
    }

    #[test]
    fn terminal_states_do_not_move() {
        let redirecting = GuardState::Redirecting {
            location: "/admin/login".to_string(),
        };
        assert_eq!(
            redirecting.clone().resolve(Some(profile()), "/elsewhere"),
            redirecting
        );

        let authorized = GuardState::Authorized(profile());
        assert_eq!(authorized.clone().resolve(None, "/admin/login"), authorized);
        assert!(!GuardState::Loading.is_terminal());
    }

    async fn guard() -> Result<(RouteGuard, Arc<MemoryProvider>)> {
        let store = Arc::new(MemoryAdminStore::new());
        store
            .insert(NewAdministrator {
                email: "a@x.com".to_string(),
                name: "Ada".to_string(),
                role: ADMIN_ROLE.to_string(),
                password_hash: "$2b$04$unused".to_string(),
            })
            .await?;
        let provider = Arc::new(MemoryProvider::new());
        let bridge = AuthProviderBridge::new(provider.clone());
        let accessor = SessionAccessor::new(bridge.clone(), store);
        Ok((RouteGuard::new(accessor, bridge, "/admin/login"), provider))
    }

    #[tokio::test]
    async fn check_authorizes_admin_session() -> Result<()> {
        let (guard, provider) = guard().await?;
        let session = provider.issue_session("a@x.com").await;
        assert!(matches!(
            guard.check(Some(&session.access_token)).await,
            GuardState::Authorized(profile) if profile.email == "a@x.com"
        ));
        assert!(matches!(
            guard.check(None).await,
            GuardState::Redirecting { .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn logout_ends_session_and_redirects() -> Result<()> {
        let (guard, provider) = guard().await?;
        let session = provider.issue_session("a@x.com").await;

        let state = guard.logout(Some(&session.access_token)).await;
        assert_eq!(
            state,
            GuardState::Redirecting {
                location: "/admin/login".to_string()
            }
        );
        assert_eq!(provider.active_sessions().await, 0);
        assert!(matches!(
            guard.check(Some(&session.access_token)).await,
            GuardState::Redirecting { .. }
        ));
        Ok(())
    }
}
