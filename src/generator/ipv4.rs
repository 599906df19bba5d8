//! IPv4 address arithmetic on host-order `u32` values.
//!
//! Every rule and the renderer go through these helpers so that network,
//! broadcast and netmask values are derived in exactly one place.

use std::net::Ipv4Addr;

use thiserror::Error;

/// Errors raised by the address helpers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ipv4Error {
    #[error("invalid IPv4 address: {0:?}")]
    Format(String),
    #[error("CIDR prefix out of range: /{0} (expected 0-32)")]
    Range(u32),
}

/// A prefix length known to be in `0..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cidr(u8);

impl Cidr {
    pub fn new(bits: u32) -> Result<Self, Ipv4Error> {
        if bits > 32 {
            return Err(Ipv4Error::Range(bits));
        }
        Ok(Self(bits as u8))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Mask with the top `bits` bits set
    pub fn mask(self) -> u32 {
        // A shift by 32 overflows, so /0 falls back to an empty mask.
        u32::MAX.checked_shl(32 - u32::from(self.0)).unwrap_or(0)
    }

    /// Point-to-point (/31) and host (/32) subnets have no network or
    /// broadcast address to exclude.
    pub fn is_point_to_point(self) -> bool {
        self.0 >= 31
    }

    /// Dotted netmask, e.g. `255.255.255.0` for /24
    pub fn netmask(self) -> String {
        format_ipv4(self.mask())
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// Parse a dotted-quad string into its integer value.
/// Octets with leading zeros are rejected.
pub fn parse_ipv4(s: &str) -> Result<u32, Ipv4Error> {
    s.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| Ipv4Error::Format(s.to_string()))
}

/// Format an integer as a dotted-quad string
pub fn format_ipv4(n: u32) -> String {
    Ipv4Addr::from(n).to_string()
}

pub fn subnet_mask(cidr: u32) -> Result<u32, Ipv4Error> {
    Cidr::new(cidr).map(Cidr::mask)
}

pub fn network_address(ip: &str, cidr: u32) -> Result<u32, Ipv4Error> {
    Ok(parse_ipv4(ip)? & subnet_mask(cidr)?)
}

pub fn broadcast_address(ip: &str, cidr: u32) -> Result<u32, Ipv4Error> {
    let mask = subnet_mask(cidr)?;
    Ok((parse_ipv4(ip)? & mask) | !mask)
}

pub fn same_subnet(a: &str, b: &str, cidr: u32) -> Result<bool, Ipv4Error> {
    Ok(network_address(a, cidr)? == network_address(b, cidr)?)
}

/// Classful default prefix used to pre-fill an empty subnet field.
pub fn suggested_cidr(ip: &str) -> Option<u8> {
    let first = parse_ipv4(ip).ok()? >> 24;
    match first {
        192..=223 => Some(24),
        128..=191 => Some(16),
        1..=126 => Some(8),
        _ => None,
    }
}

pub fn cidr_to_netmask(cidr: u32) -> Result<String, Ipv4Error> {
    Cidr::new(cidr).map(Cidr::netmask)
}

/// A subnet derived from one interface address and its prefix length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    pub network: u32,
    pub broadcast: u32,
    pub cidr: Cidr,
}

impl Subnet {
    pub fn from_addr(addr: u32, cidr: Cidr) -> Self {
        let mask = cidr.mask();
        Self {
            network: addr & mask,
            broadcast: (addr & mask) | !mask,
            cidr,
        }
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr & self.cidr.mask() == self.network
    }

    /// True when `addr` may be handed to a host: inside the subnet and, for
    /// prefixes shorter than /31, neither the network nor the broadcast.
    pub fn is_usable_host(&self, addr: u32) -> bool {
        if !self.contains(addr) {
            return false;
        }
        self.cidr.is_point_to_point() || (addr != self.network && addr != self.broadcast)
    }
}
