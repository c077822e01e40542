//! Session endpoints for cookie and bearer auth.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use super::{clear_session_cookie, session_token};
use crate::admin::{AdminGate, AdminProfile};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub success: bool,
    pub user: AdminProfile,
}

#[utoipa::path(
    get,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Session belongs to an administrator", body = SessionResponse),
        (status = 204, description = "No administrator session")
    ),
    tag = "admin"
)]
pub async fn session(headers: HeaderMap, gate: Extension<Arc<AdminGate>>) -> impl IntoResponse {
    let token = session_token(&headers);

    // Missing, expired and non-admin sessions all look the same.
    match gate.current_admin(token.as_deref()).await {
        Some(user) => (
            StatusCode::OK,
            Json(SessionResponse {
                success: true,
                user,
            }),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 204, description = "Session cleared")
    ),
    tag = "admin"
)]
pub async fn logout(headers: HeaderMap, gate: Extension<Arc<AdminGate>>) -> impl IntoResponse {
    let token = session_token(&headers);
    gate.logout(token.as_deref()).await;

    // Always clear the cookie, even if the provider session was already gone.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(gate.config()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }

    (StatusCode::NO_CONTENT, response_headers).into_response()
}
