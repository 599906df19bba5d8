use std::net::Ipv4Addr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::generator::ipv4::Cidr;

/// Device families offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Switch,
    Router,
    Ap,
}

impl DeviceType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "switch" => Some(Self::Switch),
            "router" => Some(Self::Router),
            "ap" => Some(Self::Ap),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Router => "router",
            Self::Ap => "ap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    #[default]
    Access,
    Trunk,
}

impl PortMode {
    /// An empty mode selects the default (access)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "access" => Some(Self::Access),
            "trunk" => Some(Self::Trunk),
            _ => None,
        }
    }
}

/// DNS server choice for the DHCP pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DnsOption {
    #[default]
    None,
    Google,
    Cloudflare,
    Quad9,
    OpenDns,
    Custom,
}

impl DnsOption {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "none" => Some(Self::None),
            "google" => Some(Self::Google),
            "cloudflare" => Some(Self::Cloudflare),
            "quad9" => Some(Self::Quad9),
            "opendns" => Some(Self::OpenDns),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Google => "google",
            Self::Cloudflare => "cloudflare",
            Self::Quad9 => "quad9",
            Self::OpenDns => "opendns",
            Self::Custom => "custom",
        }
    }

    /// Resolver address of a well-known provider
    pub fn provider_server(self) -> Option<Ipv4Addr> {
        match self {
            Self::Google => Some(Ipv4Addr::new(8, 8, 8, 8)),
            Self::Cloudflare => Some(Ipv4Addr::new(1, 1, 1, 1)),
            Self::Quad9 => Some(Ipv4Addr::new(9, 9, 9, 9)),
            Self::OpenDns => Some(Ipv4Addr::new(208, 67, 222, 222)),
            Self::None | Self::Custom => None,
        }
    }
}

/// One port row of the form, as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortForm {
    #[serde(default)]
    pub port_id: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub poe_enabled: bool,
}

/// ConfigForm is the raw form snapshot submitted by the UI.
///
/// Every field is kept as the user typed it; validation reads the snapshot
/// and only a fully valid snapshot is converted into a `DeviceConfigIntent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigForm {
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub dhcp_enable_global: bool,
    #[serde(default, deserialize_with = "string_or_number")]
    pub vlan_id: String,
    #[serde(default)]
    pub vlan_ip: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub vlan_subnet: String,
    #[serde(default)]
    pub vlan_network: String,
    #[serde(default)]
    pub dhcp_range_start: String,
    #[serde(default)]
    pub dhcp_range_end: String,
    #[serde(default)]
    pub dhcp_gateway: String,
    #[serde(default)]
    pub dns_option: String,
    #[serde(default)]
    pub custom_dns: String,
    #[serde(default)]
    pub ports: Vec<PortForm>,
}

impl ConfigForm {
    pub fn device(&self) -> Option<DeviceType> {
        DeviceType::parse(&self.device_type)
    }

    pub fn is_switch(&self) -> bool {
        self.device() == Some(DeviceType::Switch)
    }

    /// True when any field of the VLAN triple has been filled in
    pub fn has_vlan_input(&self) -> bool {
        [&self.vlan_id, &self.vlan_ip, &self.vlan_subnet]
            .iter()
            .any(|v| !v.trim().is_empty())
    }

    pub fn dns_is_custom(&self) -> bool {
        DnsOption::parse(&self.dns_option) == Some(DnsOption::Custom)
    }
}

/// Accept `"10"`, `10` or `null` for numeric form fields
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    })
}

/// VLAN interface: id, interface address and prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanSpec {
    pub id: u16,
    pub ip: Ipv4Addr,
    #[serde(serialize_with = "serialize_cidr")]
    pub cidr: Cidr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Ipv4Addr>,
}

fn serialize_cidr<S: serde::Serializer>(cidr: &Cidr, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(cidr.bits())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DhcpRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    pub port_id: String,
    pub mode: PortMode,
    pub poe_enabled: bool,
}

/// DeviceConfigIntent is the validated, typed form of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceConfigIntent {
    pub device_type: DeviceType,
    pub hostname: String,
    pub dhcp_enable_global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<VlanSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<DhcpRange>,
    pub dns_option: DnsOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dns: Option<Ipv4Addr>,
    pub ports: Vec<PortSpec>,
}

impl DeviceConfigIntent {
    pub fn vlan_id(&self) -> Option<u16> {
        self.vlan.as_ref().map(|v| v.id)
    }

    /// DNS server for the pool: the provider's resolver, or the custom
    /// address when `custom` is selected
    pub fn dns_server(&self) -> Option<Ipv4Addr> {
        match self.dns_option {
            DnsOption::Custom => self.custom_dns,
            other => other.provider_server(),
        }
    }
}
