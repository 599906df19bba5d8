use sqlx::{Row, sqlite::SqliteRow};

use crate::models::*;

/// Filter empty strings to None; old rows may hold '' instead of NULL
pub fn none_if_empty(opt: Option<String>) -> Option<String> {
    opt.filter(|s| !s.is_empty())
}

/// Map a SQLite row to a User struct
pub fn map_user_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Map a SQLite row to a ConfigRecord struct
pub fn map_config_row(row: &SqliteRow) -> ConfigRecord {
    let id: i64 = row.get("id");
    let ports_json: String = row.get("ports");
    let ports: Vec<PortSpec> = match serde_json::from_str(&ports_json) {
        Ok(ports) => ports,
        Err(e) => {
            tracing::warn!("Config {}: unreadable ports column: {}", id, e);
            Vec::new()
        }
    };
    let dhcp_enable_global: i32 = row.get("dhcp_enable_global");
    let is_deleted: i32 = row.get("is_deleted");
    ConfigRecord {
        id,
        user_id: row.get("user_id"),
        device_type: row.get("device_type"),
        hostname: row.get("hostname"),
        dhcp_enable_global: dhcp_enable_global != 0,
        vlan_id: row.try_get::<Option<i64>, _>("vlan_id").ok().flatten(),
        vlan_ip: none_if_empty(row.get("vlan_ip")),
        vlan_subnet: row.try_get::<Option<i64>, _>("vlan_subnet").ok().flatten(),
        vlan_network: none_if_empty(row.get("vlan_network")),
        dhcp_range_start: none_if_empty(row.get("dhcp_range_start")),
        dhcp_range_end: none_if_empty(row.get("dhcp_range_end")),
        dhcp_gateway: none_if_empty(row.get("dhcp_gateway")),
        dns_option: row.get("dns_option"),
        custom_dns: none_if_empty(row.get("custom_dns")),
        ports,
        config_text: row.get("config_text"),
        config_hash: row.get("config_hash"),
        is_deleted: is_deleted != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
