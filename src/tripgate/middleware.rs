//! Route Guard as axum middleware.

use axum::{
    extract::{Extension, Request},
    http::{header::LOCATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

use super::handlers::session_token;
use crate::admin::{AdminGate, GuardState};

/// Let the request through with the administrator attached, or send the
/// caller to the login entry point.
pub async fn require_admin(
    Extension(gate): Extension<Arc<AdminGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(request.headers());

    match gate.guard().check(token.as_deref()).await {
        GuardState::Authorized(admin) => {
            request.extensions_mut().insert(admin);
            next.run(request).await
        }
        GuardState::Redirecting { location } => {
            debug!("redirecting to {location}");
            redirect(&location)
        }
        // `check` always leaves `Loading`.
        GuardState::Loading => redirect(gate.guard().login_path()),
    }
}

fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(LOCATION, value)]).into_response(),
        Err(err) => {
            error!("Invalid login path {location}: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
