//! Backend trait seams for the two external subsystems the crate drives.
//!
//! The reconciliation and configuration logic is written against these
//! traits rather than D-Bus directly, so that tests can substitute an
//! in-memory simulation ([`crate::memory::MemoryBackend`]) for the real
//! NetworkManager backend ([`crate::dbus::NmBackend`]).

use async_trait::async_trait;

use crate::Result;
use crate::models::{DefaultRoute, Ipv4Settings, LiveIpv4, ProfileRecord};

/// The connection-management subsystem: saved profile inventory and
/// lifecycle.
///
/// Implementations map errors into the crate taxonomy where the contract
/// demands it: `list_profiles` fails with
/// [`ConfigError::InventoryUnavailable`](crate::ConfigError::InventoryUnavailable)
/// when the enumeration itself cannot run; individual unreadable records
/// are skipped with a warning instead of failing the listing.
#[async_trait]
pub trait ConnectionBackend: Send + Sync {
    /// Enumerates all saved connection profiles.
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>>;

    /// Creates an ethernet profile named `name` bound to `iface`,
    /// defaulting to DHCP.
    async fn create_profile(&self, iface: &str, name: &str) -> Result<()>;

    /// Permanently deletes the profile with the given UUID.
    async fn delete_profile(&self, uuid: &str) -> Result<()>;

    /// Reads the persisted IPv4 section of the profile named `name`, or
    /// `None` when no such profile exists yet.
    async fn read_ipv4(&self, name: &str) -> Result<Option<Ipv4Settings>>;

    /// Replaces the persisted IPv4 section of the profile named `name`.
    async fn write_ipv4(&self, name: &str, settings: &Ipv4Settings) -> Result<()>;

    /// Deactivates the profile named `name` if active, then activates it,
    /// forcing the networking subsystem to pick up new settings.
    async fn reactivate(&self, name: &str) -> Result<()>;
}

/// The OS network-state subsystem: live addressing and routing.
#[async_trait]
pub trait LinkStateBackend: Send + Sync {
    /// Returns the live IPv4 assignment of `iface`, or `None` when the
    /// interface is down, absent, or unaddressed.
    async fn live_ipv4(&self, iface: &str) -> Result<Option<LiveIpv4>>;

    /// Returns the system default IPv4 route, if one exists.
    async fn default_route(&self) -> Result<Option<DefaultRoute>>;
}
