//! Typed parsing of NetworkManager profile settings dictionaries.
//!
//! `GetSettings` returns nested variant maps (`a{sa{sv}}`). The helpers
//! here turn those into the crate's structured records. Malformed or
//! short records are skipped with a warning rather than aborting the
//! whole inventory listing; a stray unreadable profile must never hide
//! the readable ones.

use log::warn;
use std::collections::HashMap;
use zvariant::{OwnedValue, Value};

use crate::models::{Ipv4Method, Ipv4Settings, LiveIpv4, ProfileRecord};
use crate::utils::addr_from_wire;

type Section = HashMap<String, OwnedValue>;
type Settings = HashMap<String, Section>;

/// Reads a string entry out of a settings section.
fn section_str(section: &Section, key: &str) -> Option<String> {
    section
        .get(key)
        .and_then(|v| v.downcast_ref::<&str>().ok())
        .map(str::to_owned)
}

/// Parses one profile's settings into an inventory record.
///
/// Returns `None` (after logging) when the record is too malformed to
/// identify: missing `connection` section, id, or uuid. An empty
/// `interface-name` counts as unbound, not malformed.
pub(crate) fn parse_profile(path: &str, settings: &Settings) -> Option<ProfileRecord> {
    let Some(connection) = settings.get("connection") else {
        warn!("skipping profile {path}: no connection section");
        return None;
    };

    let Some(uuid) = section_str(connection, "uuid") else {
        warn!("skipping profile {path}: no uuid");
        return None;
    };

    let Some(name) = section_str(connection, "id") else {
        warn!("skipping profile {path}: no id");
        return None;
    };

    let device = section_str(connection, "interface-name").filter(|d| !d.is_empty());

    Some(ProfileRecord { uuid, name, device })
}

/// Parses the `ipv4` section of a profile into [`Ipv4Settings`].
///
/// A missing section or unrecognized method yields defaults; the status
/// reader treats those as "not DHCP, nothing persisted".
pub(crate) fn parse_ipv4(settings: &Settings) -> Ipv4Settings {
    let Some(ipv4) = settings.get("ipv4") else {
        return Ipv4Settings::default();
    };

    Ipv4Settings {
        method: section_str(ipv4, "method")
            .as_deref()
            .and_then(Ipv4Method::from_keyword),
        address: first_address(ipv4),
        gateway: section_str(ipv4, "gateway").filter(|g| !g.is_empty()),
        dns: dns_servers(ipv4),
    }
}

/// Extracts the first `address-data` entry as a CIDR string.
fn first_address(ipv4: &Section) -> Option<String> {
    let value = ipv4.get("address-data")?;
    let Value::Array(entries) = &**value else {
        return None;
    };

    let Value::Dict(entry) = entries.iter().next()? else {
        return None;
    };

    let address: &str = entry.get(&"address").ok().flatten()?;
    let prefix: u32 = entry.get(&"prefix").ok().flatten()?;

    Some(format!("{address}/{prefix}"))
}

/// Parses one live `AddressData` entry into [`LiveIpv4`].
///
/// An entry whose prefix does not fit an IPv4 prefix length is rejected,
/// never truncated.
pub(crate) fn parse_live_entry(entry: &HashMap<String, OwnedValue>) -> Option<LiveIpv4> {
    let address = entry
        .get("address")
        .and_then(|v| v.downcast_ref::<&str>().ok())
        .map(str::to_owned)?;
    let prefix = entry
        .get("prefix")
        .and_then(|v| v.downcast_ref::<u32>().ok())
        .and_then(|p| u8::try_from(p).ok())?;
    Some(LiveIpv4 { address, prefix })
}

/// Decodes the legacy `dns` entry (network-byte-order `u32` values).
fn dns_servers(ipv4: &Section) -> Vec<String> {
    let Some(value) = ipv4.get("dns") else {
        return Vec::new();
    };
    let Value::Array(entries) = &**value else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|v| v.downcast_ref::<u32>().ok())
        .map(addr_from_wire)
        .collect()
}
