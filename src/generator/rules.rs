//! Field validation rules.
//!
//! `RULES` is the single rule table: one pure check per form field. A check
//! receives the raw value and the whole form snapshot so it can compare
//! against sibling fields, and never modifies either.

use std::net::Ipv4Addr;
use std::sync::OnceLock;

use regex_lite::Regex;

use super::error::{FieldError, ValidationError, ValidationReport};
use super::ipv4::{self, Cidr, Subnet};
use crate::models::{
    ConfigForm, DeviceConfigIntent, DeviceType, DhcpRange, DnsOption, PortForm, PortMode,
    PortSpec, VlanSpec,
};

pub type RuleResult = Result<(), ValidationError>;

pub const HOSTNAME_MAX_LEN: usize = 64;
pub const VLAN_ID_MIN: u32 = 1;
pub const VLAN_ID_MAX: u32 = 4094;

const HOSTNAME_PATTERN: &str = r"^[A-Za-z0-9]([A-Za-z0-9\- ]*[A-Za-z0-9])?$";
const PORT_ID_PATTERN: &str = r"^[A-Za-z]+\d+/\d+/\d+$";

fn hostname_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HOSTNAME_PATTERN).expect("hostname pattern compiles"))
}

fn port_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PORT_ID_PATTERN).expect("port id pattern compiles"))
}

/// Scalar form fields that carry a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DeviceType,
    Hostname,
    VlanId,
    VlanSubnet,
    VlanIp,
    VlanNetwork,
    DhcpRangeStart,
    DhcpRangeEnd,
    DhcpGateway,
    DnsOption,
    CustomDns,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::DeviceType => "device_type",
            Field::Hostname => "hostname",
            Field::VlanId => "vlan_id",
            Field::VlanSubnet => "vlan_subnet",
            Field::VlanIp => "vlan_ip",
            Field::VlanNetwork => "vlan_network",
            Field::DhcpRangeStart => "dhcp_range_start",
            Field::DhcpRangeEnd => "dhcp_range_end",
            Field::DhcpGateway => "dhcp_gateway",
            Field::DnsOption => "dns_option",
            Field::CustomDns => "custom_dns",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        RULES.iter().map(|r| r.field).find(|f| f.name() == name)
    }

    /// Current raw value of this field in the snapshot
    pub fn value(self, form: &ConfigForm) -> &str {
        match self {
            Field::DeviceType => &form.device_type,
            Field::Hostname => &form.hostname,
            Field::VlanId => &form.vlan_id,
            Field::VlanSubnet => &form.vlan_subnet,
            Field::VlanIp => &form.vlan_ip,
            Field::VlanNetwork => &form.vlan_network,
            Field::DhcpRangeStart => &form.dhcp_range_start,
            Field::DhcpRangeEnd => &form.dhcp_range_end,
            Field::DhcpGateway => &form.dhcp_gateway,
            Field::DnsOption => &form.dns_option,
            Field::CustomDns => &form.custom_dns,
        }
    }

    /// Fields outside the switch section are hidden for other device types
    fn visible(self, form: &ConfigForm) -> bool {
        matches!(self, Field::DeviceType | Field::Hostname) || form.is_switch()
    }

    fn required(self, form: &ConfigForm) -> bool {
        match self {
            Field::DeviceType | Field::Hostname => true,
            Field::VlanId | Field::VlanSubnet | Field::VlanIp => form.has_vlan_input(),
            Field::DhcpRangeStart | Field::DhcpRangeEnd | Field::DhcpGateway => {
                form.dhcp_enable_global
            }
            Field::CustomDns => form.dns_is_custom(),
            Field::VlanNetwork | Field::DnsOption => false,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Rule {
    pub field: Field,
    pub check: fn(&str, &ConfigForm) -> RuleResult,
}

pub static RULES: [Rule; 11] = [
    Rule { field: Field::DeviceType, check: check_device_type },
    Rule { field: Field::Hostname, check: check_hostname },
    Rule { field: Field::VlanId, check: check_vlan_id },
    Rule { field: Field::VlanSubnet, check: check_vlan_subnet },
    Rule { field: Field::VlanIp, check: check_vlan_ip },
    Rule { field: Field::VlanNetwork, check: check_vlan_network },
    Rule { field: Field::DhcpRangeStart, check: check_dhcp_range_start },
    Rule { field: Field::DhcpRangeEnd, check: check_dhcp_range_end },
    Rule { field: Field::DhcpGateway, check: check_dhcp_gateway },
    Rule { field: Field::DnsOption, check: check_dns_option },
    Rule { field: Field::CustomDns, check: check_custom_dns },
];

/// Run one field's rule against a snapshot, regardless of applicability.
pub fn check_field(field: Field, form: &ConfigForm) -> RuleResult {
    match RULES.iter().find(|r| r.field == field) {
        Some(rule) => (rule.check)(field.value(form), form),
        None => Ok(()),
    }
}

/// Whether the rule for `field` takes part in full-form validation
pub fn applies(field: Field, form: &ConfigForm) -> bool {
    field.visible(form) && (field.required(form) || !field.value(form).trim().is_empty())
}

/// Run every applicable rule and collect all failures
pub fn validate_form(form: &ConfigForm) -> ValidationReport {
    let mut report = ValidationReport::default();

    for rule in RULES.iter() {
        if !applies(rule.field, form) {
            continue;
        }
        if let Err(e) = (rule.check)(rule.field.value(form), form) {
            report.push(rule.field.name(), e);
        }
    }

    if form.is_switch() {
        // Row 0 is checked even when the list is empty
        for index in 0..form.ports.len().max(1) {
            for attr in [PortAttr::PortId, PortAttr::Mode] {
                if let Some(Err(e)) = check_port_field(form, index, attr) {
                    report.push(port_field(index, attr.name()), e);
                }
            }
        }
    }

    report
}

/// Per-row port attributes that carry a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortAttr {
    PortId,
    Mode,
}

impl PortAttr {
    pub fn name(self) -> &'static str {
        match self {
            PortAttr::PortId => "port_id",
            PortAttr::Mode => "mode",
        }
    }
}

pub fn port_field(index: usize, name: &str) -> String {
    format!("ports[{}].{}", index, name)
}

/// Split `ports[<i>].<attr>` into its row index and attribute
pub fn parse_port_field(name: &str) -> Option<(usize, PortAttr)> {
    let rest = name.strip_prefix("ports[")?;
    let (index, attr) = rest.split_once("].")?;
    if !is_digits(index) {
        return None;
    }
    let attr = match attr {
        "port_id" => PortAttr::PortId,
        "mode" => PortAttr::Mode,
        _ => return None,
    };
    Some((index.parse().ok()?, attr))
}

/// Check one attribute of port row `index`.
///
/// `None` when the row does not exist. A missing row 0 is checked as an
/// empty row, since the first port of a switch is always required.
/// Optional rows with an empty port id pass.
pub fn check_port_field(form: &ConfigForm, index: usize, attr: PortAttr) -> Option<RuleResult> {
    let empty = PortForm::default();
    let port = match form.ports.get(index) {
        Some(port) => port,
        None if index == 0 => &empty,
        None => return None,
    };

    Some(match attr {
        PortAttr::PortId if index == 0 || !is_blank(&port.port_id) => check_port_id(&port.port_id),
        PortAttr::PortId => Ok(()),
        PortAttr::Mode => check_port_mode(&port.mode),
    })
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Parse a digit string bounded to `min..=max`; digits beyond u32 count as
/// out of range.
fn parse_bounded(value: &str, min: u32, max: u32, msg: &str) -> Result<u32, ValidationError> {
    if !is_digits(value) {
        return Err(ValidationError::format(msg));
    }
    match value.parse::<u32>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(ValidationError::range(msg)),
    }
}

/// Subnet of the VLAN interface, when both its address and prefix are valid
fn vlan_subnet(form: &ConfigForm) -> Option<Subnet> {
    let addr = ipv4::parse_ipv4(&form.vlan_ip).ok()?;
    let bits = parse_bounded(&form.vlan_subnet, 0, 32, "").ok()?;
    let cidr = Cidr::new(bits).ok()?;
    Some(Subnet::from_addr(addr, cidr))
}

fn check_device_type(value: &str, _form: &ConfigForm) -> RuleResult {
    if is_blank(value) {
        return Err(ValidationError::missing("Please choose a device type."));
    }
    DeviceType::parse(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::format("Device type must be switch, router or ap."))
}

fn check_hostname(value: &str, _form: &ConfigForm) -> RuleResult {
    if is_blank(value) {
        return Err(ValidationError::missing("Hostname cannot be empty."));
    }
    if !hostname_re().is_match(value) {
        return Err(ValidationError::format(
            "Invalid hostname (letters, numbers, spaces, hyphens allowed; must not start or end with space/hyphen).",
        ));
    }
    if value.chars().count() > HOSTNAME_MAX_LEN {
        return Err(ValidationError::range(format!(
            "Hostname must be at most {} characters.",
            HOSTNAME_MAX_LEN
        )));
    }
    Ok(())
}

fn check_vlan_id(value: &str, _form: &ConfigForm) -> RuleResult {
    if is_blank(value) {
        return Err(ValidationError::missing("VLAN ID cannot be empty."));
    }
    parse_bounded(
        value,
        VLAN_ID_MIN,
        VLAN_ID_MAX,
        "VLAN ID must be a number between 1 and 4094.",
    )
    .map(|_| ())
}

fn check_vlan_subnet(value: &str, _form: &ConfigForm) -> RuleResult {
    if is_blank(value) {
        return Err(ValidationError::missing("Subnet CIDR cannot be empty."));
    }
    parse_bounded(value, 0, 32, "Subnet CIDR must be a number between 0 and 32.").map(|_| ())
}

fn check_vlan_ip(value: &str, form: &ConfigForm) -> RuleResult {
    if is_blank(value) {
        return Err(ValidationError::missing("VLAN IP cannot be empty."));
    }
    let addr = ipv4::parse_ipv4(value)
        .map_err(|_| ValidationError::format("Invalid VLAN IP address."))?;

    if let Some(subnet) = vlan_subnet(form) {
        if !subnet.cidr.is_point_to_point() {
            if addr == subnet.network {
                return Err(ValidationError::consistency(format!(
                    "VLAN IP cannot be the network address ({}) for {}.",
                    ipv4::format_ipv4(subnet.network),
                    subnet.cidr
                )));
            }
            if addr == subnet.broadcast {
                return Err(ValidationError::consistency(format!(
                    "VLAN IP cannot be the broadcast address ({}) for {}.",
                    ipv4::format_ipv4(subnet.broadcast),
                    subnet.cidr
                )));
            }
        }
    }
    Ok(())
}

fn check_vlan_network(value: &str, form: &ConfigForm) -> RuleResult {
    let addr = ipv4::parse_ipv4(value)
        .map_err(|_| ValidationError::format("Invalid network IP address."))?;

    match vlan_subnet(form) {
        Some(subnet) if addr != subnet.network => Err(ValidationError::consistency(format!(
            "Network IP ({}) does not match the network address derived from VLAN IP ({}) and Subnet CIDR ({}). Expected: {}",
            value,
            form.vlan_ip,
            subnet.cidr,
            ipv4::format_ipv4(subnet.network)
        ))),
        Some(_) => Ok(()),
        None => Err(ValidationError::missing(
            "Please check VLAN IP or Subnet CIDR first.",
        )),
    }
}

/// Shared checks for addresses handed out by the DHCP pool
fn check_pool_address(value: &str, form: &ConfigForm, label: &str) -> Result<u32, ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::missing(format!(
            "{} is required when DHCP is enabled.",
            label
        )));
    }
    let addr = ipv4::parse_ipv4(value)
        .map_err(|_| ValidationError::format(format!("Invalid {} IP address.", label)))?;

    let subnet = vlan_subnet(form).ok_or_else(|| {
        ValidationError::missing("Please check VLAN IP or Subnet CIDR first.")
    })?;
    if !subnet.contains(addr) {
        return Err(ValidationError::consistency(format!(
            "{} must be in the same subnet as VLAN IP.",
            label
        )));
    }
    if !subnet.is_usable_host(addr) {
        return Err(ValidationError::consistency(format!(
            "{} must be within the usable range of the subnet (not network or broadcast address).",
            label
        )));
    }
    Ok(addr)
}

fn check_dhcp_range_start(value: &str, form: &ConfigForm) -> RuleResult {
    check_pool_address(value, form, "DHCP range start").map(|_| ())
}

fn check_dhcp_range_end(value: &str, form: &ConfigForm) -> RuleResult {
    let end = check_pool_address(value, form, "DHCP range end")?;
    if let Ok(start) = ipv4::parse_ipv4(&form.dhcp_range_start) {
        if end < start {
            return Err(ValidationError::consistency(
                "DHCP range end must not be lower than the range start.",
            ));
        }
    }
    Ok(())
}

fn check_dhcp_gateway(value: &str, form: &ConfigForm) -> RuleResult {
    check_pool_address(value, form, "Gateway").map(|_| ())
}

fn check_dns_option(value: &str, _form: &ConfigForm) -> RuleResult {
    DnsOption::parse(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::format(format!("Unknown DNS option: {}", value)))
}

fn check_custom_dns(value: &str, _form: &ConfigForm) -> RuleResult {
    if is_blank(value) {
        return Err(ValidationError::missing("Custom DNS cannot be empty."));
    }
    ipv4::parse_ipv4(value)
        .map(|_| ())
        .map_err(|_| ValidationError::format("Invalid DNS IP address."))
}

pub fn check_port_id(value: &str) -> RuleResult {
    if is_blank(value) {
        return Err(ValidationError::missing("Port ID cannot be empty."));
    }
    if !port_id_re().is_match(value) {
        return Err(ValidationError::format("Port ID is not valid (E.g.: GE1/0/1)."));
    }
    Ok(())
}

pub fn check_port_mode(value: &str) -> RuleResult {
    PortMode::parse(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::format("Port mode must be access or trunk."))
}

/// Convert a snapshot that passed `validate_form` into a typed intent.
///
/// Fields hidden for the device type are dropped. A parse failure here means
/// the snapshot was not validated first and is reported against the field.
pub fn build_intent(form: &ConfigForm) -> Result<DeviceConfigIntent, FieldError> {
    let invalid = |field: Field, error: ValidationError| FieldError {
        field: field.name().to_string(),
        error,
    };
    let addr = |field: Field| -> Result<Ipv4Addr, FieldError> {
        ipv4::parse_ipv4(field.value(form))
            .map(Ipv4Addr::from)
            .map_err(|e| invalid(field, ValidationError::format(e.to_string())))
    };
    let optional_addr = |field: Field| -> Result<Option<Ipv4Addr>, FieldError> {
        if is_blank(field.value(form)) {
            Ok(None)
        } else {
            addr(field).map(Some)
        }
    };

    let device_type = DeviceType::parse(&form.device_type).ok_or_else(|| {
        invalid(Field::DeviceType, ValidationError::missing("Please choose a device type."))
    })?;

    let mut intent = DeviceConfigIntent {
        device_type,
        hostname: form.hostname.clone(),
        dhcp_enable_global: false,
        vlan: None,
        dhcp: None,
        dns_option: DnsOption::None,
        custom_dns: None,
        ports: Vec::new(),
    };
    if device_type != DeviceType::Switch {
        return Ok(intent);
    }

    intent.dhcp_enable_global = form.dhcp_enable_global;

    if form.has_vlan_input() {
        let id = parse_bounded(&form.vlan_id, VLAN_ID_MIN, VLAN_ID_MAX, "invalid VLAN ID")
            .map_err(|e| invalid(Field::VlanId, e))?;
        let cidr = parse_bounded(&form.vlan_subnet, 0, 32, "invalid subnet CIDR")
            .and_then(|bits| {
                Cidr::new(bits).map_err(|e| ValidationError::range(e.to_string()))
            })
            .map_err(|e| invalid(Field::VlanSubnet, e))?;
        intent.vlan = Some(VlanSpec {
            id: id as u16,
            ip: addr(Field::VlanIp)?,
            cidr,
            network: optional_addr(Field::VlanNetwork)?,
        });
    }

    let pool_fields = [Field::DhcpRangeStart, Field::DhcpRangeEnd, Field::DhcpGateway];
    if pool_fields.iter().all(|f| !is_blank(f.value(form))) {
        intent.dhcp = Some(DhcpRange {
            start: addr(Field::DhcpRangeStart)?,
            end: addr(Field::DhcpRangeEnd)?,
            gateway: addr(Field::DhcpGateway)?,
        });
    }

    intent.dns_option = DnsOption::parse(&form.dns_option).ok_or_else(|| {
        invalid(Field::DnsOption, ValidationError::format("Unknown DNS option."))
    })?;
    if intent.dns_option == DnsOption::Custom {
        intent.custom_dns = optional_addr(Field::CustomDns)?;
    }

    for port in &form.ports {
        if is_blank(&port.port_id) {
            continue;
        }
        intent.ports.push(PortSpec {
            port_id: port.port_id.clone(),
            mode: PortMode::parse(&port.mode).unwrap_or_default(),
            poe_enabled: port.poe_enabled,
        });
    }

    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PortForm;

    fn switch_form() -> ConfigForm {
        ConfigForm {
            device_type: "switch".into(),
            hostname: "Core-SW 01".into(),
            vlan_id: "10".into(),
            vlan_ip: "192.168.10.1".into(),
            vlan_subnet: "24".into(),
            ports: vec![PortForm {
                port_id: "GE1/0/1".into(),
                mode: "access".into(),
                poe_enabled: true,
            }],
            ..Default::default()
        }
    }

    fn with_dhcp(mut form: ConfigForm) -> ConfigForm {
        form.dhcp_enable_global = true;
        form.vlan_network = "192.168.10.0".into();
        form.dhcp_range_start = "192.168.10.10".into();
        form.dhcp_range_end = "192.168.10.100".into();
        form.dhcp_gateway = "192.168.10.1".into();
        form
    }

    #[test]
    fn test_hostname_rule() {
        let form = ConfigForm::default();
        assert!(check_hostname("Core-SW 01", &form).is_ok());
        assert!(check_hostname("SW1", &form).is_ok());
        assert!(check_hostname("a", &form).is_ok());
        assert!(matches!(check_hostname("-bad-", &form), Err(ValidationError::Format(_))));
        assert!(matches!(check_hostname("bad ", &form), Err(ValidationError::Format(_))));
        assert!(matches!(check_hostname("sw_01", &form), Err(ValidationError::Format(_))));
        assert!(matches!(check_hostname("", &form), Err(ValidationError::PreconditionMissing(_))));
        assert!(matches!(check_hostname(&"a".repeat(65), &form), Err(ValidationError::Range(_))));
        assert!(check_hostname(&"a".repeat(64), &form).is_ok());
    }

    #[test]
    fn test_vlan_id_rule() {
        let form = ConfigForm::default();
        assert!(check_vlan_id("1", &form).is_ok());
        assert!(check_vlan_id("4094", &form).is_ok());
        assert!(matches!(check_vlan_id("0", &form), Err(ValidationError::Range(_))));
        assert!(matches!(check_vlan_id("4095", &form), Err(ValidationError::Range(_))));
        assert!(matches!(check_vlan_id("99999999999", &form), Err(ValidationError::Range(_))));
        assert!(matches!(check_vlan_id("10a", &form), Err(ValidationError::Format(_))));
        assert!(matches!(check_vlan_id("-5", &form), Err(ValidationError::Format(_))));
    }

    #[test]
    fn test_vlan_subnet_rule() {
        let form = ConfigForm::default();
        assert!(check_vlan_subnet("0", &form).is_ok());
        assert!(check_vlan_subnet("32", &form).is_ok());
        assert!(matches!(check_vlan_subnet("33", &form), Err(ValidationError::Range(_))));
        assert!(matches!(check_vlan_subnet("/24", &form), Err(ValidationError::Format(_))));
    }

    #[test]
    fn test_vlan_ip_excludes_network_and_broadcast() {
        let form = switch_form();
        assert!(check_vlan_ip("192.168.10.1", &form).is_ok());
        assert!(matches!(check_vlan_ip("192.168.10.0", &form), Err(ValidationError::Consistency(_))));
        assert!(matches!(check_vlan_ip("192.168.10.255", &form), Err(ValidationError::Consistency(_))));
        assert!(matches!(check_vlan_ip("192.168.10", &form), Err(ValidationError::Format(_))));
    }

    #[test]
    fn test_vlan_ip_point_to_point_exempt() {
        let mut form = switch_form();
        form.vlan_subnet = "31".into();
        assert!(check_vlan_ip("10.0.0.0", &form).is_ok());
        assert!(check_vlan_ip("10.0.0.1", &form).is_ok());
        form.vlan_subnet = "32".into();
        assert!(check_vlan_ip("10.0.0.7", &form).is_ok());
    }

    #[test]
    fn test_vlan_ip_without_cidr_only_checks_format() {
        let mut form = switch_form();
        form.vlan_subnet.clear();
        assert!(check_vlan_ip("192.168.10.0", &form).is_ok());
    }

    #[test]
    fn test_vlan_network_must_match() {
        let form = switch_form();
        assert!(check_vlan_network("192.168.10.0", &form).is_ok());
        let err = check_vlan_network("192.168.10.1", &form).unwrap_err();
        assert!(matches!(err, ValidationError::Consistency(_)));
        assert!(err.to_string().contains("Expected: 192.168.10.0"));

        let mut broken = switch_form();
        broken.vlan_ip = "bogus".into();
        assert!(matches!(
            check_vlan_network("192.168.10.0", &broken),
            Err(ValidationError::PreconditionMissing(_))
        ));
    }

    #[test]
    fn test_dhcp_range_rules() {
        let form = with_dhcp(switch_form());
        assert!(check_dhcp_range_start("192.168.10.10", &form).is_ok());
        assert!(check_dhcp_range_end("192.168.10.100", &form).is_ok());
        assert!(matches!(
            check_dhcp_range_start("192.168.10.0", &form),
            Err(ValidationError::Consistency(_))
        ));
        assert!(matches!(
            check_dhcp_range_end("192.168.10.255", &form),
            Err(ValidationError::Consistency(_))
        ));
        assert!(matches!(
            check_dhcp_range_start("192.168.20.10", &form),
            Err(ValidationError::Consistency(_))
        ));
        assert!(matches!(
            check_dhcp_range_end("192.168.10.5", &form),
            Err(ValidationError::Consistency(_))
        ));
        assert!(matches!(
            check_dhcp_range_start("", &form),
            Err(ValidationError::PreconditionMissing(_))
        ));
    }

    #[test]
    fn test_dhcp_end_compares_as_unsigned() {
        let mut form = with_dhcp(switch_form());
        form.vlan_ip = "200.0.0.1".into();
        form.vlan_subnet = "8".into();
        form.dhcp_range_start = "200.0.0.10".into();
        assert!(check_dhcp_range_end("200.255.0.10", &form).is_ok());
        assert!(check_dhcp_range_end("200.0.0.9", &form).is_err());
    }

    #[test]
    fn test_dhcp_requires_vlan_subnet() {
        let mut form = with_dhcp(switch_form());
        form.vlan_ip.clear();
        assert!(matches!(
            check_dhcp_gateway("192.168.10.1", &form),
            Err(ValidationError::PreconditionMissing(_))
        ));
    }

    #[test]
    fn test_gateway_rule() {
        let form = with_dhcp(switch_form());
        assert!(check_dhcp_gateway("192.168.10.1", &form).is_ok());
        assert!(check_dhcp_gateway("192.168.10.255", &form).is_err());
        assert!(check_dhcp_gateway("10.0.0.1", &form).is_err());
    }

    #[test]
    fn test_custom_dns_rule() {
        let mut form = switch_form();
        form.dns_option = "custom".into();
        let report = validate_form(&form);
        assert!(matches!(
            report.get("custom_dns"),
            Some(ValidationError::PreconditionMissing(_))
        ));
        form.custom_dns = "1.2.3.4".into();
        assert!(validate_form(&form).is_valid());
        form.custom_dns = "1.2.3".into();
        assert!(matches!(validate_form(&form).get("custom_dns"), Some(ValidationError::Format(_))));
    }

    #[test]
    fn test_port_id_rule() {
        assert!(check_port_id("GE1/0/1").is_ok());
        assert!(check_port_id("XGE1/0/48").is_ok());
        assert!(check_port_id("GE1/0").is_err());
        assert!(check_port_id("1/0/1").is_err());
        assert!(check_port_id("GE1/0/1 ").is_err());
        assert!(matches!(check_port_id(""), Err(ValidationError::PreconditionMissing(_))));
    }

    #[test]
    fn test_validate_form_collects_every_error() {
        let mut form = with_dhcp(switch_form());
        form.hostname = "-bad-".into();
        form.vlan_id = "5000".into();
        form.dhcp_range_start = "192.168.10.0".into();
        form.ports.push(PortForm {
            port_id: "eth0".into(),
            ..Default::default()
        });

        let report = validate_form(&form);
        let fields: Vec<&str> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["hostname", "vlan_id", "dhcp_range_start", "ports[1].port_id"]);
    }

    #[test]
    fn test_vlan_group_requires_all_three() {
        let mut form = switch_form();
        form.vlan_ip.clear();
        form.vlan_subnet.clear();
        let report = validate_form(&form);
        assert!(matches!(report.get("vlan_ip"), Some(ValidationError::PreconditionMissing(_))));
        assert!(matches!(report.get("vlan_subnet"), Some(ValidationError::PreconditionMissing(_))));
        assert!(report.get("vlan_id").is_none());
    }

    #[test]
    fn test_dhcp_enabled_requires_pool_fields() {
        let mut form = switch_form();
        form.dhcp_enable_global = true;
        let report = validate_form(&form);
        for field in ["dhcp_range_start", "dhcp_range_end", "dhcp_gateway"] {
            assert!(
                matches!(report.get(field), Some(ValidationError::PreconditionMissing(_))),
                "{field}"
            );
        }
    }

    #[test]
    fn test_empty_optional_port_is_allowed() {
        let mut form = switch_form();
        form.ports.push(PortForm::default());
        assert!(validate_form(&form).is_valid());

        form.ports[0].port_id.clear();
        assert!(matches!(
            validate_form(&form).get("ports[0].port_id"),
            Some(ValidationError::PreconditionMissing(_))
        ));
    }

    #[test]
    fn test_switch_without_ports_requires_first_row() {
        let mut form = switch_form();
        form.ports.clear();
        let report = validate_form(&form);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.get("ports[0].port_id"),
            Some(ValidationError::PreconditionMissing(_))
        ));
        assert!(crate::generator::generate(&form).is_err());
    }

    #[test]
    fn test_port_field_names() {
        assert_eq!(parse_port_field("ports[0].port_id"), Some((0, PortAttr::PortId)));
        assert_eq!(parse_port_field("ports[12].mode"), Some((12, PortAttr::Mode)));
        assert_eq!(parse_port_field(&port_field(3, PortAttr::Mode.name())), Some((3, PortAttr::Mode)));
        assert_eq!(parse_port_field("ports[].mode"), None);
        assert_eq!(parse_port_field("ports[-1].mode"), None);
        assert_eq!(parse_port_field("ports[0].poe_enabled"), None);
        assert_eq!(parse_port_field("hostname"), None);
    }

    #[test]
    fn test_check_single_port_field() {
        let mut form = switch_form();
        form.ports[0].port_id = "eth0".into();
        form.ports.push(PortForm {
            port_id: String::new(),
            mode: "hybrid".into(),
            poe_enabled: false,
        });

        assert!(matches!(
            check_port_field(&form, 0, PortAttr::PortId),
            Some(Err(ValidationError::Format(_)))
        ));
        assert_eq!(check_port_field(&form, 1, PortAttr::PortId), Some(Ok(())));
        assert!(matches!(
            check_port_field(&form, 1, PortAttr::Mode),
            Some(Err(ValidationError::Format(_)))
        ));
        assert_eq!(check_port_field(&form, 2, PortAttr::PortId), None);

        form.ports.clear();
        assert!(matches!(
            check_port_field(&form, 0, PortAttr::PortId),
            Some(Err(ValidationError::PreconditionMissing(_)))
        ));
    }

    #[test]
    fn test_switch_fields_ignored_for_router() {
        let form = ConfigForm {
            device_type: "router".into(),
            hostname: "R1".into(),
            vlan_id: "nope".into(),
            ..Default::default()
        };
        assert!(validate_form(&form).is_valid());
        let intent = build_intent(&form).unwrap();
        assert_eq!(intent.device_type, DeviceType::Router);
        assert!(intent.vlan.is_none());
    }

    #[test]
    fn test_missing_device_type() {
        let form = ConfigForm {
            hostname: "R1".into(),
            ..Default::default()
        };
        assert!(matches!(
            validate_form(&form).get("device_type"),
            Some(ValidationError::PreconditionMissing(_))
        ));
    }

    #[test]
    fn test_build_intent_from_valid_form() {
        let mut form = with_dhcp(switch_form());
        form.dns_option = "google".into();
        form.ports.push(PortForm::default());
        form.ports.push(PortForm {
            port_id: "GE1/0/2".into(),
            mode: "trunk".into(),
            poe_enabled: false,
        });
        assert!(validate_form(&form).is_valid());

        let intent = build_intent(&form).unwrap();
        let vlan = intent.vlan.clone().unwrap();
        assert_eq!(vlan.id, 10);
        assert_eq!(vlan.cidr.bits(), 24);
        assert_eq!(vlan.network, Some(Ipv4Addr::new(192, 168, 10, 0)));
        assert_eq!(intent.dhcp.as_ref().unwrap().start, Ipv4Addr::new(192, 168, 10, 10));
        assert_eq!(intent.dns_server(), Some(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(intent.ports.len(), 2);
        assert_eq!(intent.ports[1].mode, PortMode::Trunk);
    }

    #[test]
    fn test_field_names_round_trip() {
        for rule in RULES.iter() {
            assert_eq!(Field::from_name(rule.field.name()), Some(rule.field));
        }
        assert_eq!(Field::from_name("ports"), None);
    }
}
