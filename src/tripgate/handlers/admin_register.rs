use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use super::{failure, Failure};
use crate::admin::{email::normalize_email, AdminGate, AuthError, Credentials, Registration};

#[derive(ToSchema, Serialize, Deserialize)]
pub struct AdminRegister {
    email: String,
    password: String,
    name: String,
}

impl std::fmt::Debug for AdminRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminRegister")
            .field("email", &self.email)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterSuccess {
    pub success: bool,
}

#[utoipa::path(
    post,
    path= "/api/admin/register",
    request_body = AdminRegister,
    responses (
        (status = 201, description = "Administrator and provider account created", body = RegisterSuccess),
        (status = 400, description = "Missing payload, malformed email, empty name or password", body = Failure),
        (status = 409, description = "An administrator with this email already exists", body = Failure),
        (status = 500, description = "Store or provider failure", body = Failure),
    ),
    tag= "admin"
)]
#[instrument(skip_all)]
pub async fn register(
    gate: Extension<Arc<AdminGate>>,
    payload: Option<Json<AdminRegister>>,
) -> Response {
    let request: AdminRegister = match payload {
        Some(Json(payload)) => payload,
        None => return failure(StatusCode::BAD_REQUEST, "Missing payload"),
    };

    let registration = Registration {
        credentials: Credentials::new(normalize_email(&request.email), request.password),
        name: request.name,
    };

    match gate.register(registration).await {
        Ok(profile) => {
            info!(admin_id = %profile.id, "registration complete");
            (
                StatusCode::CREATED,
                Json(RegisterSuccess { success: true }),
            )
                .into_response()
        }

        Err(AuthError::InvalidRequest(reason)) => failure(StatusCode::BAD_REQUEST, &reason),

        Err(AuthError::AlreadyRegistered) => {
            failure(StatusCode::CONFLICT, "Administrator already exists")
        }

        Err(AuthError::AuthProvisioningFailed(reason)) => {
            warn!("Provider account not created: {reason}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
        }

        Err(err) => {
            error!("Registration error: {err:?}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during registration",
            )
        }
    }
}
