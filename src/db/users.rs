use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::models::User;

use super::row_helpers::map_user_row;
use super::ConflictError;

const SELECT_USER: &str = r#"
    SELECT id, name, email, password_hash, role, created_at, updated_at
    FROM users
"#;

/// User database operations
pub struct UserRepo;

impl UserRepo {
    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_USER))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.as_ref().map(map_user_row))
    }

    pub async fn get_by_email(pool: &Pool<Sqlite>, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("{} WHERE email = ?", SELECT_USER))
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(row.as_ref().map(map_user_row))
    }

    pub async fn create(
        pool: &Pool<Sqlite>,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                anyhow::Error::new(ConflictError("Email is already registered".to_string()))
            }
            other => anyhow::Error::new(other),
        })?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("User not found after creation")
    }
}
