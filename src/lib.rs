//! # Tripgate (Admin Session & Credential Gate)
//!
//! `tripgate` guards the travel agency's admin dashboard. It owns the
//! `admin_users` table and delegates sessions to an external GoTrue-compatible
//! auth provider.
//!
//! ## Login
//!
//! 1. The supplied password is checked against the bcrypt hash stored in
//!    `admin_users`.
//! 2. The gate then signs in at the provider. An administrator that has no
//!    provider account yet gets one created on first login (provisioning).
//!
//! ## Protected routes
//!
//! Every protected request resolves the provider session carried by the
//! request (bearer token or `tripgate_session` cookie) and cross-checks its
//! email against `admin_users`. Anything short of a match redirects to the
//! login entry point; callers cannot tell "not logged in" from "not an admin".

pub mod admin;
pub mod cli;
pub mod provider;
pub mod tripgate;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
