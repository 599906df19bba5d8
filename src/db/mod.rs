mod configs;
pub(crate) mod row_helpers;
mod users;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::*;

/// Typed "resource not found" error, downcast by the API error handler.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Typed uniqueness conflict, downcast by the API error handler to 409.
#[derive(Debug)]
pub struct ConflictError(pub String);

impl std::fmt::Display for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConflictError {}

/// Store handles all database operations, delegating to per-entity repo modules.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new database store with a specific pool size.
    /// `:memory:` opens a private in-memory database on a single connection.
    pub async fn with_pool_size(db_path: &str, max_connections: u32) -> Result<Self> {
        if db_path == ":memory:" {
            return Self::in_memory().await;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// In-memory store; every connection would see its own database, so the
    /// pool is pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // ========== User Operations ==========

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        users::UserRepo::get(&self.pool, id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        users::UserRepo::get_by_email(&self.pool, email).await
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User> {
        users::UserRepo::create(&self.pool, name, email, password_hash, role).await
    }

    // ========== Config History Operations ==========

    pub async fn save_config(&self, rec: &NewConfigRecord) -> Result<ConfigRecord> {
        configs::ConfigRepo::create(&self.pool, rec).await
    }

    pub async fn get_config(&self, id: i64) -> Result<Option<ConfigRecord>> {
        configs::ConfigRepo::get(&self.pool, id).await
    }

    /// Get a record owned by `user_id`, soft-deleted or not
    pub async fn get_user_config(&self, id: i64, user_id: i64) -> Result<ConfigRecord> {
        match self.get_config(id).await? {
            Some(rec) if rec.user_id == user_id => Ok(rec),
            _ => Err(NotFoundError::new("Configuration", &id.to_string()).into()),
        }
    }

    pub async fn list_active_configs(&self, user_id: i64) -> Result<Vec<ConfigRecord>> {
        configs::ConfigRepo::list_for_user(&self.pool, user_id, false).await
    }

    pub async fn list_deleted_configs(&self, user_id: i64) -> Result<Vec<ConfigRecord>> {
        configs::ConfigRepo::list_for_user(&self.pool, user_id, true).await
    }

    /// An active record of `user_id` with identical rendered text, if any
    pub async fn find_active_config_by_hash(
        &self,
        user_id: i64,
        hash: &str,
    ) -> Result<Option<ConfigRecord>> {
        configs::ConfigRepo::find_active_by_hash(&self.pool, user_id, hash).await
    }

    pub async fn soft_delete_config(&self, id: i64, user_id: i64) -> Result<u64> {
        configs::ConfigRepo::set_deleted(&self.pool, id, user_id, true).await
    }

    pub async fn restore_config(&self, id: i64, user_id: i64) -> Result<u64> {
        configs::ConfigRepo::set_deleted(&self.pool, id, user_id, false).await
    }
}
