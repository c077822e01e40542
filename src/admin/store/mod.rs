//! Administrator store.
//!
//! The gate only needs a handful of operations, so the store is a trait and
//! the concrete backend is picked at startup and injected.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::model::{AdminProfile, Administrator, NewAdministrator};

mod memory;
mod postgres;

pub use memory::MemoryAdminStore;
pub use postgres::PgAdminStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(AdminProfile),
    EmailTaken,
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Full row (with hash) whose email matches, ignoring case.
    async fn find_by_email(&self, email: &str) -> Result<Option<Administrator>>;

    /// Public fields only, same matching as `find_by_email`.
    async fn profile_by_email(&self, email: &str) -> Result<Option<AdminProfile>>;

    /// Emails differing only in case count as taken.
    async fn insert(&self, admin: NewAdministrator) -> Result<InsertOutcome>;

    /// Remove a row by id. Used to undo a registration whose provider
    /// sign-up failed.
    async fn remove(&self, id: Uuid) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}
