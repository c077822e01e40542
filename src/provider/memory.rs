//! In-process auth provider for local development and tests.

use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AuthProvider, ProviderError, ProviderUser, Session, SignIn, SignUp};
use crate::admin::model::Credentials;

const SESSION_TTL_SECONDS: u64 = 60 * 60;

struct Account {
    user: ProviderUser,
    password: SecretString,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, ProviderUser>,
}

/// Accounts and sessions held in memory. Sign-in and sign-up calls are
/// counted so callers can observe which path a login took.
#[derive(Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
    sign_in_calls: AtomicUsize,
    sign_up_calls: AtomicUsize,
}

impl MemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account.
    #[must_use]
    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.state.get_mut().accounts.insert(
            email.to_string(),
            Account {
                user: ProviderUser {
                    id: Uuid::new_v4().to_string(),
                    email: Some(email.to_string()),
                },
                password: SecretString::from(password.to_string()),
            },
        );
        self
    }

    /// Issue a session for an arbitrary email, bypassing the password check.
    pub async fn issue_session(&self, email: &str) -> Session {
        let user = ProviderUser {
            id: Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
        };
        self.open_session(user).await
    }

    pub async fn has_account(&self, email: &str) -> bool {
        self.state.lock().await.accounts.contains_key(email)
    }

    pub async fn active_sessions(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_up_calls(&self) -> usize {
        self.sign_up_calls.load(Ordering::SeqCst)
    }

    async fn open_session(&self, user: ProviderUser) -> Session {
        let access_token = new_token();
        self.state
            .lock()
            .await
            .sessions
            .insert(access_token.clone(), user.clone());

        Session {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: SESSION_TTL_SECONDS,
            refresh_token: Some(new_token()),
            user,
        }
    }
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

#[async_trait]
impl AuthProvider for MemoryProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);

        let user = {
            let state = self.state.lock().await;
            state
                .accounts
                .get(credentials.email())
                .filter(|account| {
                    account.password.expose_secret() == credentials.password().expose_secret()
                })
                .map(|account| account.user.clone())
        };

        match user {
            Some(user) => Ok(SignIn::Established(self.open_session(user).await)),
            None => Ok(SignIn::Rejected("Invalid login credentials".to_string())),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp, ProviderError> {
        self.sign_up_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock().await;
        if state.accounts.contains_key(credentials.email()) {
            return Ok(SignUp::AlreadyRegistered);
        }

        state.accounts.insert(
            credentials.email().to_string(),
            Account {
                user: ProviderUser {
                    id: Uuid::new_v4().to_string(),
                    email: Some(credentials.email().to_string()),
                },
                password: credentials.password().clone(),
            },
        );

        Ok(SignUp::Created)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.state.lock().await.sessions.remove(access_token);
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, ProviderError> {
        Ok(self.state.lock().await.sessions.get(access_token).cloned())
    }
}
