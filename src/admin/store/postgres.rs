//! Postgres-backed administrator store.
//!
//! Flow Overview:
//! 1) Apply `sql/schema.sql` at startup (idempotent).
//! 2) Look up rows by email, ignoring case, for login and session checks.
//! 3) Insert with `ON CONFLICT DO NOTHING` so the unique indexes decide
//!    duplicates without a racy pre-check.
//!
//! Rows are decoded with `try_get`; a row that does not fit the expected
//! shape is an error, not a panic.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, Connection, PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::{AdminStore, InsertOutcome};
use crate::admin::model::{AdminProfile, Administrator, NewAdministrator};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

#[derive(Clone, Debug)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `admin_users` table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the schema statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "CREATE",
            db.statement = SCHEMA_SQL
        );
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to apply admin_users schema")?;
        Ok(())
    }
}

fn profile_from_row(row: &PgRow) -> Result<AdminProfile, sqlx::Error> {
    Ok(AdminProfile {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
    })
}

fn administrator_from_row(row: &PgRow) -> Result<Administrator, sqlx::Error> {
    Ok(Administrator {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        password_hash: row.try_get("password_hash")?,
    })
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Administrator>> {
        let query = r"
            SELECT id, email, name, role, password_hash
            FROM admin_users
            WHERE lower(email) = lower($1)
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup administrator")?;

        row.as_ref()
            .map(administrator_from_row)
            .transpose()
            .context("malformed admin_users row")
    }

    async fn profile_by_email(&self, email: &str) -> Result<Option<AdminProfile>> {
        let query = r"
            SELECT id, email, name, role
            FROM admin_users
            WHERE lower(email) = lower($1)
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup administrator profile")?;

        row.as_ref()
            .map(profile_from_row)
            .transpose()
            .context("malformed admin_users row")
    }

    async fn insert(&self, admin: NewAdministrator) -> Result<InsertOutcome> {
        let query = r"
            INSERT INTO admin_users (email, name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            RETURNING id, email, name, role
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(&admin.email)
            .bind(&admin.name)
            .bind(&admin.role)
            .bind(&admin.password_hash)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert administrator")?;

        match row {
            Some(row) => Ok(InsertOutcome::Inserted(
                profile_from_row(&row).context("malformed admin_users row")?,
            )),
            None => Ok(InsertOutcome::EmailTaken),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<()> {
        let query = "DELETE FROM admin_users WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to remove administrator")?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let acquire_span = tracing::info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("failed to acquire database connection")?;

        let ping_span =
            tracing::info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("failed to ping database")?;
        Ok(())
    }
}
