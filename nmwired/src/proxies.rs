//! D-Bus proxy traits for NetworkManager interfaces.
//!
//! These traits define the NetworkManager D-Bus API surface used by this
//! crate. The `zbus::proxy` macro generates proxy implementations that
//! handle D-Bus communication automatically.
//!
//! # NetworkManager D-Bus Structure
//!
//! - `/org/freedesktop/NetworkManager` - Main NM object
//! - `/org/freedesktop/NetworkManager/Devices/*` - Device objects
//! - `/org/freedesktop/NetworkManager/Settings` - Profile store
//! - `/org/freedesktop/NetworkManager/Settings/*` - Individual profiles
//! - `/org/freedesktop/NetworkManager/IP4Config/*` - Live IPv4 state
//! - `/org/freedesktop/NetworkManager/ActiveConnection/*` - Active connections

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::{OwnedObjectPath, OwnedValue, Value};

/// Proxy for the main NetworkManager interface.
///
/// Provides device lookup and connection activation control.
#[proxy(
    interface = "org.freedesktop.NetworkManager",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager"
)]
pub trait NM {
    /// Resolves a device object path from a kernel interface name.
    fn get_device_by_ip_iface(&self, iface: &str) -> Result<OwnedObjectPath>;

    /// Activates an existing saved connection.
    ///
    /// Passing `/` for `device` lets NetworkManager pick the device from
    /// the profile's `interface-name` binding.
    fn activate_connection(
        &self,
        connection: &OwnedObjectPath,
        device: &OwnedObjectPath,
        specific_object: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath>;

    /// Deactivates an active connection.
    fn deactivate_connection(&self, active_connection: &OwnedObjectPath) -> Result<()>;

    /// Paths to all active connections.
    #[zbus(property)]
    fn active_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// The active connection currently holding the default route
    /// (`/` if none).
    #[zbus(property)]
    fn primary_connection(&self) -> Result<OwnedObjectPath>;
}

/// Proxy for the NetworkManager settings (profile store) interface.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager/Settings"
)]
pub trait NMSettings {
    /// Returns paths to all saved connection profiles.
    fn list_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Creates a new saved profile from a settings dictionary and
    /// returns its path.
    fn add_connection(
        &self,
        connection: HashMap<&str, HashMap<&str, Value<'_>>>,
    ) -> Result<OwnedObjectPath>;

    /// Resolves a profile path from its UUID.
    fn get_connection_by_uuid(&self, uuid: &str) -> Result<OwnedObjectPath>;
}

/// Proxy for an individual saved connection profile.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings.Connection",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMSettingsConnection {
    /// Returns the full settings dictionary of the profile.
    fn get_settings(&self) -> Result<HashMap<String, HashMap<String, OwnedValue>>>;

    /// Replaces the profile's settings and persists them to disk.
    fn update(&self, properties: HashMap<&str, HashMap<&str, Value<'_>>>) -> Result<()>;

    /// Permanently deletes the profile.
    fn delete(&self) -> Result<()>;
}

/// Proxy for NetworkManager device interface.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Device",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMDevice {
    /// The network interface name (e.g., "eth0").
    #[zbus(property)]
    fn interface(&self) -> Result<String>;

    /// Path to the device's live IPv4 configuration (`/` if none).
    #[zbus(property)]
    fn ip4_config(&self) -> Result<OwnedObjectPath>;
}

/// Proxy for live IPv4 configuration state.
#[proxy(
    interface = "org.freedesktop.NetworkManager.IP4Config",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMIP4Config {
    /// Assigned addresses as dictionaries with `address` and `prefix` keys.
    #[zbus(property)]
    fn address_data(&self) -> Result<Vec<HashMap<String, OwnedValue>>>;

    /// Gateway address in use (empty string if none).
    #[zbus(property)]
    fn gateway(&self) -> Result<String>;
}

/// Proxy for an active connection.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Connection.Active",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMActiveConnection {
    /// The profile id this active connection was started from.
    #[zbus(property)]
    fn id(&self) -> Result<String>;

    /// Paths to the devices this connection runs on.
    #[zbus(property)]
    fn devices(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Path to the live IPv4 configuration (`/` if none).
    #[zbus(property)]
    fn ip4_config(&self) -> Result<OwnedObjectPath>;
}
