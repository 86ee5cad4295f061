//! NetworkManager settings dictionary builders for wired profiles.
//!
//! Constructs the D-Bus settings dictionaries consumed by the
//! `AddConnection` and `Update` methods.
//!
//! # NetworkManager Settings Structure
//!
//! A connection is represented as a nested dictionary:
//! - `connection`: General settings (type, id, uuid, interface-name)
//! - `802-3-ethernet`: Wired settings (empty; defaults apply)
//! - `ipv4` / `ipv6`: IP configuration
//!
//! `Update` replaces a profile's settings wholesale, so the `ipv4`
//! section is always built complete: in DHCP mode the address, gateway
//! and DNS keys are written empty rather than omitted, so stale manual
//! values cannot resurface if the method later flips back.

use std::collections::HashMap;
use zvariant::Value;

use crate::constants::connection_type;
use crate::models::{ConfigError, Ipv4Method, Ipv4Settings};
use crate::utils::addr_to_wire;

type Section = HashMap<&'static str, Value<'static>>;

/// Builds the full settings dictionary for a canonical wired profile
/// bound to `iface`, defaulting to DHCP on both IP stacks.
///
/// The caller supplies the UUID: a fresh one when creating, the
/// existing one when rebuilding settings for `Update`, since a
/// profile's UUID is its identity and must never change in place.
pub(crate) fn build_wired_profile(
    iface: &str,
    name: &str,
    uuid: &str,
) -> HashMap<&'static str, Section> {
    let mut connection = Section::new();
    connection.insert("type", Value::from(connection_type::ETHERNET));
    connection.insert("id", Value::from(name.to_string()));
    connection.insert("uuid", Value::from(uuid.to_string()));
    connection.insert("interface-name", Value::from(iface.to_string()));
    connection.insert("autoconnect", Value::from(true));

    let mut ipv4 = Section::new();
    ipv4.insert("method", Value::from("auto"));

    let mut ipv6 = Section::new();
    ipv6.insert("method", Value::from("auto"));

    let mut settings = HashMap::new();
    settings.insert("connection", connection);
    // Empty wired section; NM applies ethernet defaults.
    settings.insert(connection_type::ETHERNET, Section::new());
    settings.insert("ipv4", ipv4);
    settings.insert("ipv6", ipv6);
    settings
}

/// Builds a complete `ipv4` section from the desired settings.
///
/// Fails with `InvalidConfig` if a manual address is not in CIDR form
/// or a DNS server is not a valid dotted-decimal address; callers are
/// expected to have validated input before reaching this point.
pub(crate) fn build_ipv4_section(settings: &Ipv4Settings) -> Result<Section, ConfigError> {
    let mut ipv4 = Section::new();

    let method = settings.method.unwrap_or(Ipv4Method::Auto);
    ipv4.insert("method", Value::from(method.as_str()));

    let mut address_data: Vec<HashMap<String, Value<'static>>> = Vec::new();
    if let Some(cidr) = &settings.address {
        let (address, prefix) = split_cidr(cidr)?;
        let mut entry: HashMap<String, Value<'static>> = HashMap::new();
        entry.insert("address".into(), Value::from(address.to_string()));
        entry.insert("prefix".into(), Value::from(prefix));
        address_data.push(entry);
    }
    ipv4.insert("address-data", Value::from(address_data));

    ipv4.insert(
        "gateway",
        Value::from(settings.gateway.clone().unwrap_or_default()),
    );

    let mut dns: Vec<u32> = Vec::new();
    for server in &settings.dns {
        dns.push(addr_to_wire(server)?);
    }
    ipv4.insert("dns", Value::from(dns));

    Ok(ipv4)
}

/// Splits `ip/prefix` CIDR notation.
fn split_cidr(cidr: &str) -> Result<(&str, u32), ConfigError> {
    let (address, prefix) = cidr.split_once('/').ok_or_else(|| {
        ConfigError::InvalidConfig(format!("address '{cidr}' is not in CIDR form"))
    })?;
    let prefix: u32 = prefix.parse().map_err(|_| {
        ConfigError::InvalidConfig(format!("invalid prefix length in '{cidr}'"))
    })?;
    Ok((address, prefix))
}
