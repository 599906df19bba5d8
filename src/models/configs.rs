use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::intent::PortSpec;
use crate::generator::{FieldError, RenderedConfig, ValidationReport};

/// ConfigRecord is one saved configuration in a user's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub id: i64,
    pub user_id: i64,
    pub device_type: String,
    pub hostname: String,
    pub dhcp_enable_global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_subnet: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_range_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_range_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_gateway: Option<String>,
    pub dns_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dns: Option<String>,
    pub ports: Vec<PortSpec>,
    pub config_text: String,
    pub config_hash: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for inserting a freshly rendered configuration
#[derive(Debug, Clone)]
pub struct NewConfigRecord {
    pub user_id: i64,
    pub device_type: String,
    pub hostname: String,
    pub dhcp_enable_global: bool,
    pub vlan_id: Option<i64>,
    pub vlan_ip: Option<String>,
    pub vlan_subnet: Option<i64>,
    pub vlan_network: Option<String>,
    pub dhcp_range_start: Option<String>,
    pub dhcp_range_end: Option<String>,
    pub dhcp_gateway: Option<String>,
    pub dns_option: String,
    pub custom_dns: Option<String>,
    pub ports: Vec<PortSpec>,
    pub config_text: String,
    pub config_hash: String,
}

impl NewConfigRecord {
    pub fn from_rendered(user_id: i64, rendered: &RenderedConfig) -> Self {
        let intent = &rendered.intent;
        let vlan = intent.vlan.as_ref();
        let dhcp = intent.dhcp.as_ref();
        Self {
            user_id,
            device_type: intent.device_type.as_str().to_string(),
            hostname: intent.hostname.clone(),
            dhcp_enable_global: intent.dhcp_enable_global,
            vlan_id: vlan.map(|v| i64::from(v.id)),
            vlan_ip: vlan.map(|v| v.ip.to_string()),
            vlan_subnet: vlan.map(|v| i64::from(v.cidr.bits())),
            vlan_network: vlan.and_then(|v| v.network).map(|n| n.to_string()),
            dhcp_range_start: dhcp.map(|d| d.start.to_string()),
            dhcp_range_end: dhcp.map(|d| d.end.to_string()),
            dhcp_gateway: dhcp.map(|d| d.gateway.to_string()),
            dns_option: intent.dns_option.as_str().to_string(),
            custom_dns: intent.custom_dns.map(|d| d.to_string()),
            ports: intent.ports.clone(),
            config_text: rendered.config_text.clone(),
            config_hash: rendered.config_hash.clone(),
        }
    }
}

/// Response for a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub config_text: String,
    pub config_hash: String,
}

/// Response for a CIDR suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestCidrResponse {
    pub ip: String,
    pub cidr: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateQuery {
    pub field: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestCidrQuery {
    #[serde(default)]
    pub ip: String,
}

/// Field-error report for the current form snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl From<ValidationReport> for ValidateResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            valid: report.is_valid(),
            errors: report.errors,
        }
    }
}

/// Response for a save request; `duplicate` is set when an identical active
/// record already existed and was returned instead
#[derive(Debug, Clone, Serialize)]
pub struct SaveConfigResponse {
    pub message: String,
    pub duplicate: bool,
    pub config: ConfigRecord,
}
