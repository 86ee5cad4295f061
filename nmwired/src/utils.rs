//! Helpers for IPv4 mask, prefix, and wire-format conversions.
//!
//! NetworkManager stores DNS servers in profile settings as network
//! byte order `u32` values; the conversions live here so the rest of
//! the crate deals in dotted-decimal strings only.

use std::net::Ipv4Addr;

use crate::models::ConfigError;

/// Computes the network prefix length from a dotted-decimal mask.
///
/// Counts set bits across the four octets, each parsed as an 8-bit
/// unsigned value. A malformed octet is a caller error, never silently
/// defaulted.
pub(crate) fn prefix_from_mask(mask: &str) -> Result<u8, ConfigError> {
    let octets: Vec<&str> = mask.split('.').collect();
    if octets.len() != 4 {
        return Err(ConfigError::InvalidConfig(format!(
            "subnet mask '{mask}' must have four octets"
        )));
    }

    let mut prefix = 0u8;
    for octet in octets {
        let value: u8 = octet.trim().parse().map_err(|_| {
            ConfigError::InvalidConfig(format!("malformed subnet mask octet '{octet}' in '{mask}'"))
        })?;
        prefix += value.count_ones() as u8;
    }
    Ok(prefix)
}

/// Renders a prefix length as a dotted-decimal mask (24 → `255.255.255.0`).
pub(crate) fn mask_from_prefix(prefix: u8) -> String {
    let bits = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix.min(32)))
    };
    Ipv4Addr::from(bits).to_string()
}

/// Converts a dotted-decimal address to NetworkManager's legacy
/// network-byte-order `u32` wire form.
pub(crate) fn addr_to_wire(addr: &str) -> Result<u32, ConfigError> {
    let parsed: Ipv4Addr = addr.trim().parse().map_err(|_| {
        ConfigError::InvalidConfig(format!("malformed IPv4 address '{addr}'"))
    })?;
    Ok(u32::from(parsed).to_be())
}

/// Converts a network-byte-order `u32` back to dotted-decimal.
pub(crate) fn addr_from_wire(raw: u32) -> String {
    Ipv4Addr::from(u32::from_be(raw)).to_string()
}
