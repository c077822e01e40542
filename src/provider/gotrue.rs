//! GoTrue REST client (the auth API behind Supabase and compatible hosts).
//!
//! Endpoints used, relative to the configured base URL:
//! - `POST /token?grant_type=password` sign in
//! - `POST /signup` create an account
//! - `POST /logout` revoke the caller's session
//! - `GET /user` resolve an access token to its account
//!
//! Every request carries the project's `apikey` header.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use super::{AuthProvider, ProviderError, ProviderUser, Session, SignIn, SignUp};
use crate::{admin::model::Credentials, APP_USER_AGENT};

#[derive(Clone)]
pub struct GoTrueProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for GoTrueProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

/// Error payloads differ between GoTrue releases; accept both shapes.
#[derive(Deserialize, Default, Debug)]
struct ErrorBody {
    error: Option<String>,
    error_code: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> Option<&str> {
        self.error_code.as_deref().or(self.error.as_deref())
    }

    fn message(&self) -> String {
        self.error_description
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }

    fn already_registered(&self) -> bool {
        self.code() == Some("user_already_exists")
            || self.message().to_lowercase().contains("already registered")
    }
}

async fn error_body(response: Response) -> Result<(StatusCode, ErrorBody), ProviderError> {
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str(&text).unwrap_or_default();
    Ok((status, body))
}

fn unexpected(status: StatusCode, body: &ErrorBody) -> ProviderError {
    ProviderError::Unexpected {
        status: status.as_u16(),
        message: body.message(),
    }
}

impl GoTrueProvider {
    /// Build a client for the GoTrue API at `base_url`,
    /// e.g. `https://<project>.supabase.co/auth/v1`.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self> {
        let url = Url::parse(base_url)
            .with_context(|| format!("Invalid provider URL: {base_url}"))?;

        match url.scheme() {
            "http" | "https" => (),
            scheme => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Error creating reqwest client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", self.api_key.expose_secret())
    }
}

#[async_trait]
impl AuthProvider for GoTrueProvider {
    #[instrument(skip(self, credentials), fields(email = credentials.email()))]
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignIn, ProviderError> {
        let url = self.endpoint("/token?grant_type=password");
        let response = self
            .with_api_key(self.client.post(&url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&json!({
                "email": credentials.email(),
                "password": credentials.password().expose_secret(),
            }))
            .send()
            .await?;

        if response.status().is_success() {
            let session: Session = response
                .json()
                .await
                .map_err(|e| ProviderError::Malformed(e.to_string()))?;
            return Ok(SignIn::Established(session));
        }

        let (status, body) = error_body(response).await?;
        debug!("sign in refused: {} {:?}", status, body.code());

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                Ok(SignIn::Rejected(body.message()))
            }
            _ => Err(unexpected(status, &body)),
        }
    }

    #[instrument(skip(self, credentials), fields(email = credentials.email()))]
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUp, ProviderError> {
        let url = self.endpoint("/signup");
        let response = self
            .with_api_key(self.client.post(&url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&json!({
                "email": credentials.email(),
                "password": credentials.password().expose_secret(),
            }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(SignUp::Created);
        }

        let (status, body) = error_body(response).await?;

        if body.already_registered() {
            return Ok(SignUp::AlreadyRegistered);
        }

        Err(unexpected(status, &body))
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let url = self.endpoint("/logout");
        let response = self
            .with_api_key(self.client.post(&url))
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            // Already expired or revoked: nothing left to sign out.
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(()),
            _ => {
                let (status, body) = error_body(response).await?;
                Err(unexpected(status, &body))
            }
        }
    }

    #[instrument(skip_all)]
    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, ProviderError> {
        let url = self.endpoint("/user");
        let response = self
            .with_api_key(self.client.get(&url))
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: ProviderUser = response
                    .json()
                    .await
                    .map_err(|e| ProviderError::Malformed(e.to_string()))?;
                Ok(Some(user))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => {
                let (status, body) = error_body(response).await?;
                Err(unexpected(status, &body))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn provider(server: &MockServer) -> Result<GoTrueProvider> {
        GoTrueProvider::new(&server.uri(), SecretString::from("anon-key".to_string()))
    }

    fn session_json() -> serde_json::Value {
        json!({
            "access_token": "access-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1_900_000_000,
            "refresh_token": "refresh-1",
            "user": {
                "id": "6b0c1c36-0000-4000-8000-000000000001",
                "aud": "authenticated",
                "email": "a@x.com"
            }
        })
    }

    #[test]
    fn new_rejects_unsupported_scheme() {
        let result = GoTrueProvider::new("ftp://auth.example.com", SecretString::from("k".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn endpoint_trims_trailing_slash() -> Result<()> {
        let provider = GoTrueProvider::new(
            "https://project.supabase.co/auth/v1/",
            SecretString::from("k".to_string()),
        )?;
        assert_eq!(
            provider.endpoint("/signup"),
            "https://project.supabase.co/auth/v1/signup"
        );
        Ok(())
    }

    #[test]
    fn debug_masks_api_key() -> Result<()> {
        let provider = GoTrueProvider::new(
            "https://auth.example.com",
            SecretString::from("super-secret".to_string()),
        )?;
        assert!(!format!("{provider:?}").contains("super-secret"));
        Ok(())
    }

    #[test]
    fn error_body_accepts_both_shapes() -> Result<()> {
        let legacy: ErrorBody = serde_json::from_value(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }))?;
        assert_eq!(legacy.code(), Some("invalid_grant"));
        assert_eq!(legacy.message(), "Invalid login credentials");

        let current: ErrorBody = serde_json::from_value(json!({
            "code": 422,
            "error_code": "user_already_exists",
            "msg": "User already registered"
        }))?;
        assert!(current.already_registered());
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_returns_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_json(json!({"email": "a@x.com", "password": "p1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
            .mount(&server)
            .await;

        let outcome = provider(&server)?
            .sign_in(&Credentials::new("a@x.com", "p1"))
            .await?;

        let SignIn::Established(session) = outcome else {
            anyhow::bail!("expected a session, got {outcome:?}");
        };
        assert_eq!(session.access_token, "access-1");
        assert_eq!(session.user.email.as_deref(), Some("a@x.com"));
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_invalid_grant_is_rejected() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let outcome = provider(&server)?
            .sign_in(&Credentials::new("a@x.com", "p1"))
            .await?;
        assert_eq!(
            outcome,
            SignIn::Rejected("Invalid login credentials".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn sign_in_server_error_is_an_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let result = provider(&server)?
            .sign_in(&Credentials::new("a@x.com", "p1"))
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::Unexpected { status: 503, .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_detects_existing_account() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/signup"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "error_code": "user_already_exists",
                "msg": "User already registered"
            })))
            .mount(&server)
            .await;

        let outcome = provider(&server)?
            .sign_up(&Credentials::new("a@x.com", "p1"))
            .await?;
        assert_eq!(outcome, SignUp::AlreadyRegistered);
        Ok(())
    }

    #[tokio::test]
    async fn sign_up_weak_password_is_an_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/signup"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "error_code": "weak_password",
                "msg": "Password should be at least 6 characters."
            })))
            .mount(&server)
            .await;

        let result = provider(&server)?
            .sign_up(&Credentials::new("a@x.com", "p1"))
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::Unexpected { status: 422, .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn current_user_resolves_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer access-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "6b0c1c36-0000-4000-8000-000000000001",
                "email": "a@x.com",
                "role": "authenticated"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer expired"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "msg": "invalid JWT"
            })))
            .mount(&server)
            .await;

        let provider = provider(&server)?;
        let user = provider.current_user("access-1").await?;
        assert_eq!(user.and_then(|u| u.email).as_deref(), Some("a@x.com"));
        assert_eq!(provider.current_user("expired").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn sign_out_tolerates_revoked_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logout"))
            .and(header("authorization", "Bearer gone"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        provider(&server)?.sign_out("gone").await?;
        Ok(())
    }
}
