//! Admin Session & Credential Gate.
//!
//! - [`verifier`]: email/password against the bcrypt hash in `admin_users`.
//! - [`accessor`]: provider session to administrator, or nothing.
//! - [`guard`]: `Loading -> {Authorized, Redirecting}` for protected routes.
//! - [`gate`]: wires the above with the provider bridge and owns registration.

pub mod accessor;
pub mod email;
pub mod error;
pub mod gate;
pub mod guard;
pub mod model;
pub mod password;
pub mod store;
pub mod verifier;

pub use error::AuthError;
pub use gate::{AdminGate, GateConfig, LoginGrant};
pub use guard::{GuardState, RouteGuard};
pub use model::{AdminProfile, Credentials, Registration};
