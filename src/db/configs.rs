use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::models::*;

use super::row_helpers::map_config_row;

const SELECT_CONFIG: &str = r#"
    SELECT id, user_id, device_type, hostname, dhcp_enable_global, vlan_id, vlan_ip,
           vlan_subnet, vlan_network, dhcp_range_start, dhcp_range_end, dhcp_gateway,
           dns_option, custom_dns, ports, config_text, config_hash, is_deleted,
           created_at, updated_at
    FROM configs
"#;

/// Saved configuration history operations
pub struct ConfigRepo;

impl ConfigRepo {
    pub async fn create(pool: &Pool<Sqlite>, rec: &NewConfigRecord) -> Result<ConfigRecord> {
        let now = Utc::now();
        let ports = serde_json::to_string(&rec.ports)?;
        let result = sqlx::query(
            r#"
            INSERT INTO configs (user_id, device_type, hostname, dhcp_enable_global, vlan_id, vlan_ip,
                                 vlan_subnet, vlan_network, dhcp_range_start, dhcp_range_end, dhcp_gateway,
                                 dns_option, custom_dns, ports, config_text, config_hash, is_deleted,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(rec.user_id)
        .bind(&rec.device_type)
        .bind(&rec.hostname)
        .bind(if rec.dhcp_enable_global { 1i32 } else { 0i32 })
        .bind(rec.vlan_id)
        .bind(&rec.vlan_ip)
        .bind(rec.vlan_subnet)
        .bind(&rec.vlan_network)
        .bind(&rec.dhcp_range_start)
        .bind(&rec.dhcp_range_end)
        .bind(&rec.dhcp_gateway)
        .bind(&rec.dns_option)
        .bind(&rec.custom_dns)
        .bind(&ports)
        .bind(&rec.config_text)
        .bind(&rec.config_hash)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, result.last_insert_rowid())
            .await?
            .context("Config not found after creation")
    }

    pub async fn get(pool: &Pool<Sqlite>, id: i64) -> Result<Option<ConfigRecord>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_CONFIG))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.as_ref().map(map_config_row))
    }

    /// A user's records with the given deleted flag, newest first
    pub async fn list_for_user(
        pool: &Pool<Sqlite>,
        user_id: i64,
        deleted: bool,
    ) -> Result<Vec<ConfigRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE user_id = ? AND is_deleted = ? ORDER BY created_at DESC, id DESC",
            SELECT_CONFIG
        ))
        .bind(user_id)
        .bind(if deleted { 1i32 } else { 0i32 })
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(map_config_row).collect())
    }

    /// Most recent active record of `user_id` carrying this content hash
    pub async fn find_active_by_hash(
        pool: &Pool<Sqlite>,
        user_id: i64,
        hash: &str,
    ) -> Result<Option<ConfigRecord>> {
        let row = sqlx::query(&format!(
            "{} WHERE user_id = ? AND config_hash = ? AND is_deleted = 0 ORDER BY created_at DESC, id DESC LIMIT 1",
            SELECT_CONFIG
        ))
        .bind(user_id)
        .bind(hash)
        .fetch_optional(pool)
        .await?;

        Ok(row.as_ref().map(map_config_row))
    }

    /// Flip the deleted flag on a record owned by `user_id`.
    /// Returns the number of rows that actually changed state.
    pub async fn set_deleted(
        pool: &Pool<Sqlite>,
        id: i64,
        user_id: i64,
        deleted: bool,
    ) -> Result<u64> {
        let (to, from) = if deleted { (1i32, 0i32) } else { (0i32, 1i32) };
        let result = sqlx::query(
            "UPDATE configs SET is_deleted = ?, updated_at = ? WHERE id = ? AND user_id = ? AND is_deleted = ?",
        )
        .bind(to)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .bind(from)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
