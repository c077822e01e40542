pub mod health;
pub use self::health::health;

pub mod admin_login;
pub use self::admin_login::login;

pub mod admin_register;
pub use self::admin_register::register;

pub mod admin_session;
pub use self::admin_session::{logout, session};

pub mod dashboard;
pub use self::dashboard::dashboard;

// common functions for the handlers
use axum::{
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::admin::GateConfig;

pub const SESSION_COOKIE_NAME: &str = "tripgate_session";

/// Body of every failed admin call.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

pub fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(Failure {
            success: false,
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Access token carried by the request: bearer header first, then cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token);
    }

    let value = headers.get(COOKIE)?.to_str().ok()?;
    value.split(';').find_map(|pair| {
        let (key, val) = pair.trim().split_once('=')?;
        (key.trim() == SESSION_COOKIE_NAME && !val.trim().is_empty())
            .then(|| val.trim().to_string())
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// `HttpOnly` cookie holding the provider access token.
pub fn session_cookie(
    config: &GateConfig,
    token: &str,
    expires_in: u64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = if expires_in > 0 {
        expires_in
    } else {
        config.session_ttl_seconds()
    };
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    // Only mark cookies secure when the frontend is served over HTTPS.
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn clear_session_cookie(config: &GateConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
