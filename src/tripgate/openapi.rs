use utoipa::OpenApi;

use super::handlers::{
    admin_login, admin_register, admin_session, dashboard, health, Failure,
};
use crate::{
    admin::AdminProfile,
    provider::{ProviderUser, Session},
};

// Title, version, description and license come from Cargo.toml.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        admin_login::login,
        admin_register::register,
        admin_session::session,
        admin_session::logout,
        dashboard::dashboard,
    ),
    components(schemas(
        health::Health,
        admin_login::AdminLogin,
        admin_login::LoginSuccess,
        admin_register::AdminRegister,
        admin_register::RegisterSuccess,
        admin_session::SessionResponse,
        dashboard::Dashboard,
        dashboard::Section,
        AdminProfile,
        Session,
        ProviderUser,
        Failure,
    )),
    tags(
        (name = "admin", description = "Administrator login, registration and session"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
