use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument, warn};
use utoipa::ToSchema;

use super::{failure, session_cookie, Failure};
use crate::{
    admin::{email::normalize_email, AdminGate, AdminProfile, AuthError, Credentials},
    provider::Session,
};

#[derive(ToSchema, Serialize, Deserialize)]
pub struct AdminLogin {
    email: String,
    password: String,
}

impl std::fmt::Debug for AdminLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminLogin")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginSuccess {
    pub success: bool,
    pub user: AdminProfile,
    pub session: Session,
}

#[utoipa::path(
    post,
    path= "/api/admin/login",
    request_body = AdminLogin,
    responses (
        (status = 200, description = "Administrator logged in, session cookie set", body = LoginSuccess),
        (status = 400, description = "Missing payload", body = Failure),
        (status = 401, description = "Invalid credentials", body = Failure),
        (status = 500, description = "Provider session could not be established", body = Failure),
    ),
    tag= "admin"
)]
#[instrument(skip_all)]
pub async fn login(gate: Extension<Arc<AdminGate>>, payload: Option<Json<AdminLogin>>) -> Response {
    let request: AdminLogin = match payload {
        Some(Json(payload)) => payload,
        None => return failure(StatusCode::BAD_REQUEST, "Missing payload"),
    };

    let credentials = Credentials::new(normalize_email(&request.email), request.password);

    match gate.login(&credentials).await {
        Ok(grant) => {
            let mut headers = HeaderMap::new();
            match session_cookie(
                gate.config(),
                &grant.session.access_token,
                grant.session.expires_in,
            ) {
                Ok(cookie) => {
                    headers.insert(SET_COOKIE, cookie);
                }
                Err(err) => error!("Failed to build session cookie: {err}"),
            }

            let body = LoginSuccess {
                success: true,
                user: grant.user,
                session: grant.session,
            };

            (StatusCode::OK, headers, Json(body)).into_response()
        }

        Err(AuthError::InvalidCredentials) => {
            failure(StatusCode::UNAUTHORIZED, "Invalid credentials")
        }

        Err(AuthError::AuthProvisioningFailed(reason)) => {
            warn!("Provider session not established: {reason}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
        }

        Err(err) => {
            error!("Login error: {err:?}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during login",
            )
        }
    }
}
