use axum::{extract::Extension, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::admin::AdminProfile;

/// Navigation entry of the admin area.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub href: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Dashboard {
    pub admin: AdminProfile,
    pub sections: Vec<Section>,
}

const SECTIONS: [(&str, &str); 6] = [
    ("Dashboard", "/admin/dashboard"),
    ("Cities", "/admin/dashboard/cities"),
    ("Packages", "/admin/dashboard/packages"),
    ("Hero Banners", "/admin/dashboard/hero-banners"),
    ("Reviews", "/admin/dashboard/reviews"),
    ("Popular Destinations", "/admin/dashboard/destinations"),
];

#[must_use]
pub fn sections() -> Vec<Section> {
    SECTIONS
        .iter()
        .map(|(name, href)| Section {
            name: (*name).to_string(),
            href: (*href).to_string(),
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Administrator and admin navigation", body = Dashboard),
        (status = 303, description = "No administrator session, redirect to the login entry point")
    ),
    tag = "admin"
)]
// Only reachable through `require_admin`, which inserts the profile.
pub async fn dashboard(Extension(admin): Extension<AdminProfile>) -> impl IntoResponse {
    Json(Dashboard {
        admin,
        sections: sections(),
    })
}
