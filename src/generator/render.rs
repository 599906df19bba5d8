//! Comware-style (`system-view`) CLI rendering of a validated intent.

use super::ipv4::Subnet;
use crate::models::{DeviceConfigIntent, DeviceType, PortMode, PortSpec, VlanSpec, DhcpRange};

/// Line-oriented builder; every pushed line is newline-terminated.
#[derive(Default)]
struct CliText {
    out: String,
}

impl CliText {
    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        self.out.push_str(&args.to_string());
        self.out.push('\n');
    }

    fn exit(&mut self) {
        self.out.push_str("exit\n");
    }
}

macro_rules! cli {
    ($text:expr, $($arg:tt)*) => {
        $text.line(format_args!($($arg)*))
    };
}

/// Render an intent into CLI text.
///
/// The intent must have come out of validation. Broken invariants panic
/// instead of producing a half-valid configuration.
pub fn render(intent: &DeviceConfigIntent) -> String {
    assert!(!intent.hostname.is_empty(), "render called with an empty hostname");

    let mut text = CliText::default();
    cli!(text, "system-view");
    cli!(text, "sysname {}", intent.hostname);

    match intent.device_type {
        DeviceType::Switch => render_switch(&mut text, intent),
        DeviceType::Router => cli!(text, "! Router configuration placeholder"),
        DeviceType::Ap => cli!(text, "! Access Point configuration placeholder"),
    }

    text.exit();
    cli!(text, "save force");
    text.out
}

fn render_switch(text: &mut CliText, intent: &DeviceConfigIntent) {
    if intent.dhcp_enable_global {
        cli!(text, "dhcp enable");
    }

    if let Some(vlan) = &intent.vlan {
        render_vlan_interface(text, vlan);

        if intent.dhcp_enable_global {
            if let (Some(range), Some(network)) = (&intent.dhcp, vlan.network) {
                render_dhcp_pool(text, vlan, network, range, intent.dns_server());
            }
        }
    }

    for port in intent.ports.iter().filter(|p| !p.port_id.is_empty()) {
        render_port(text, port, intent.vlan_id());
    }
}

fn render_vlan_interface(text: &mut CliText, vlan: &VlanSpec) {
    cli!(text, "vlan {}", vlan.id);
    text.exit();
    cli!(text, "interface Vlan-interface{}", vlan.id);
    cli!(text, " ip address {} {}", vlan.ip, vlan.cidr.netmask());
    text.exit();
}

fn render_dhcp_pool(
    text: &mut CliText,
    vlan: &VlanSpec,
    network: std::net::Ipv4Addr,
    range: &DhcpRange,
    dns: Option<std::net::Ipv4Addr>,
) {
    let subnet = Subnet::from_addr(u32::from(vlan.ip), vlan.cidr);
    assert_eq!(
        u32::from(network),
        subnet.network,
        "pool network {} does not match VLAN {} subnet",
        network,
        vlan.id
    );
    for addr in [range.start, range.end, range.gateway] {
        assert!(
            subnet.is_usable_host(u32::from(addr)),
            "pool address {} outside VLAN {} subnet",
            addr,
            vlan.id
        );
    }
    assert!(range.start <= range.end, "pool range {} - {} is reversed", range.start, range.end);

    cli!(text, "dhcp server ip-pool VLAN{}", vlan.id);
    cli!(text, " network {} mask {}", network, vlan.cidr.netmask());
    cli!(text, " gateway-list {}", range.gateway);
    if let Some(dns) = dns {
        cli!(text, " dns-list {}", dns);
    }
    cli!(text, " address range {} {}", range.start, range.end);
    text.exit();

    cli!(text, "interface Vlan-interface{}", vlan.id);
    cli!(text, " dhcp select server ip-pool VLAN{}", vlan.id);
    text.exit();
}

fn render_port(text: &mut CliText, port: &PortSpec, vlan_id: Option<u16>) {
    cli!(text, "interface {}", port.port_id);
    if let Some(id) = vlan_id {
        match port.mode {
            PortMode::Access => {
                cli!(text, " port link-type access");
                cli!(text, " port access vlan {}", id);
            }
            PortMode::Trunk => {
                cli!(text, " port link-type trunk");
                cli!(text, " port trunk permit vlan {}", id);
            }
        }
    }
    if port.poe_enabled {
        cli!(text, " poe enable");
    }
    text.exit();
}
