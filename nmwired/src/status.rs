//! Interface status snapshots.
//!
//! Merges live OS state with the canonical profile's persisted
//! configuration. A snapshot always succeeds: collection failures
//! degrade to unset fields and are carried as warnings, because status
//! reads feed displays and must not fail just because an interface is
//! momentarily down.

use log::debug;

use crate::backend::{ConnectionBackend, LinkStateBackend};
use crate::models::{InterfaceStatus, Ipv4Method, StatusWarning};
use crate::reconcile::canonical_name;
use crate::utils::mask_from_prefix;

/// Collects a best-effort status snapshot for `iface`.
pub(crate) async fn snapshot(
    connections: &dyn ConnectionBackend,
    links: &dyn LinkStateBackend,
    iface: &str,
    label: &str,
) -> InterfaceStatus {
    let mut status = InterfaceStatus {
        id: iface.to_string(),
        label: label.to_string(),
        ip_address: None,
        subnet_mask: None,
        gateway: None,
        dhcp: false,
        dns: None,
        warnings: Vec::new(),
    };

    match links.live_ipv4(iface).await {
        Ok(Some(live)) => {
            status.subnet_mask = Some(mask_from_prefix(live.prefix));
            status.ip_address = Some(live.address);
        }
        Ok(None) => debug!("[{iface}] no live IPv4 state"),
        Err(e) => status.warnings.push(StatusWarning::LiveState(e.to_string())),
    }

    // The gateway is attributed to this interface only when the default
    // route explicitly leaves through it; another interface's gateway
    // must never show up here.
    match links.default_route().await {
        Ok(Some(route)) if route.device == iface => status.gateway = Some(route.gateway),
        Ok(_) => {}
        Err(e) => status.warnings.push(StatusWarning::LiveState(e.to_string())),
    }

    let name = canonical_name(iface);
    match connections.read_ipv4(&name).await {
        Ok(Some(ipv4)) => {
            status.dhcp = ipv4.method == Some(Ipv4Method::Auto);
            if ipv4.method == Some(Ipv4Method::Manual) && !ipv4.dns.is_empty() {
                status.dns = Some(ipv4.dns);
            }
        }
        Ok(None) => debug!("[{iface}] no canonical profile '{name}' yet"),
        Err(e) => status.warnings.push(StatusWarning::Profile(e.to_string())),
    }

    status
}
