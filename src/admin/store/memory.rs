//! In-process administrator store for local development and tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AdminStore, InsertOutcome};
use crate::admin::model::{AdminProfile, Administrator, NewAdministrator};

/// Rows keyed by lowercased email, mirroring the `lower(email)` unique index
/// of the SQL schema. The stored row keeps the email as inserted.
#[derive(Debug, Default)]
pub struct MemoryAdminStore {
    rows: RwLock<HashMap<String, Administrator>>,
}

impl MemoryAdminStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

fn key(email: &str) -> String {
    email.to_lowercase()
}

#[async_trait]
impl AdminStore for MemoryAdminStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Administrator>> {
        Ok(self.rows.read().await.get(&key(email)).cloned())
    }

    async fn profile_by_email(&self, email: &str) -> Result<Option<AdminProfile>> {
        Ok(self
            .rows
            .read()
            .await
            .get(&key(email))
            .map(Administrator::profile))
    }

    async fn insert(&self, admin: NewAdministrator) -> Result<InsertOutcome> {
        let mut rows = self.rows.write().await;
        let key = key(&admin.email);
        if rows.contains_key(&key) {
            return Ok(InsertOutcome::EmailTaken);
        }

        let row = Administrator {
            id: Uuid::new_v4(),
            email: admin.email,
            name: admin.name,
            role: admin.role,
            password_hash: admin.password_hash,
        };
        let profile = row.profile();
        rows.insert(key, row);

        Ok(InsertOutcome::Inserted(profile))
    }

    async fn remove(&self, id: Uuid) -> Result<()> {
        self.rows.write().await.retain(|_, row| row.id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
