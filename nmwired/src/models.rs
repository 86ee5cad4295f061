use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::utils::prefix_from_mask;

/// IPv4 configuration method of a connection profile.
///
/// Maps to the `ipv4.method` setting of a NetworkManager profile.
/// Profiles managed by this crate are always exactly one of these two;
/// other NM methods (`disabled`, `link-local`, ...) are never written
/// and are reported as-is when read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ipv4Method {
    /// Address assignment via DHCP.
    Auto,
    /// Statically configured address.
    Manual,
}

impl Ipv4Method {
    /// The `ipv4.method` keyword as NetworkManager spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }

    /// Parses an `ipv4.method` keyword. Returns `None` for methods
    /// this crate does not manage.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

impl Display for Ipv4Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One record of the connection profile inventory.
///
/// A profile may exist unbound (`device == None`); such profiles are
/// never deletion candidates during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    /// NetworkManager's profile UUID.
    pub uuid: String,
    /// The profile id (`connection.id`).
    pub name: String,
    /// Interface the profile is bound to, if any (`connection.interface-name`).
    pub device: Option<String>,
}

/// The persisted IPv4 section of a connection profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ipv4Settings {
    /// Configuration method. Defaults to DHCP.
    pub method: Option<Ipv4Method>,
    /// Address in CIDR notation (e.g. `10.0.0.5/24`), manual method only.
    pub address: Option<String>,
    /// Default gateway, manual method only.
    pub gateway: Option<String>,
    /// DNS servers in priority order.
    pub dns: Vec<String>,
}

/// Live IPv4 state of an interface as reported by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveIpv4 {
    /// Assigned address in dotted-decimal form.
    pub address: String,
    /// Network prefix length.
    pub prefix: u8,
}

/// The system default IPv4 route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoute {
    /// Gateway address.
    pub gateway: String,
    /// Interface the route leaves through.
    pub device: String,
}

/// Static IPv4 parameters supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticIpv4 {
    /// Address in dotted-decimal form (no prefix).
    pub ip: String,
    /// Subnet mask in dotted-decimal form (e.g. `255.255.255.0`).
    pub mask: String,
    /// Optional default gateway.
    #[serde(default)]
    pub gateway: Option<String>,
    /// Optional DNS servers in priority order.
    #[serde(default)]
    pub dns: Option<Vec<String>>,
}

/// Desired configuration for a managed interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum IfaceConfig {
    /// Address assignment via DHCP.
    Dhcp,
    /// Statically configured IPv4 parameters.
    Static(StaticIpv4),
}

impl IfaceConfig {
    /// Validates the configuration before any external mutation.
    ///
    /// Static mode requires a non-empty address and a well-formed
    /// dotted-decimal mask. DHCP mode carries no parameters and is
    /// always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Dhcp => Ok(()),
            Self::Static(s) => {
                if s.ip.trim().is_empty() {
                    return Err(ConfigError::InvalidConfig("ip address is required".into()));
                }
                if s.mask.trim().is_empty() {
                    return Err(ConfigError::InvalidConfig("subnet mask is required".into()));
                }
                prefix_from_mask(&s.mask)?;
                Ok(())
            }
        }
    }
}

/// Non-fatal problem encountered while collecting a status snapshot.
///
/// Snapshots are used for display and must never fail outright just
/// because an interface is momentarily down; instead the affected
/// fields stay unset and the cause is carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "source", content = "detail")]
pub enum StatusWarning {
    /// Live interface state could not be read.
    LiveState(String),
    /// The canonical profile could not be read.
    Profile(String),
}

impl Display for StatusWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LiveState(d) => write!(f, "live state unavailable: {d}"),
            Self::Profile(d) => write!(f, "profile unreadable: {d}"),
        }
    }
}

/// Merged live + persisted status of a managed interface.
///
/// Field names serialize in camelCase to match the shape the HTTP
/// collaborator exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStatus {
    /// Interface identifier (e.g. `eth0`).
    pub id: String,
    /// Display label from the injected interface table.
    pub label: String,
    /// Live assigned address, if any.
    pub ip_address: Option<String>,
    /// Live subnet mask in dotted-decimal form, if any.
    pub subnet_mask: Option<String>,
    /// Live default gateway, only when this interface owns the default route.
    pub gateway: Option<String>,
    /// Whether the canonical profile is configured for DHCP.
    pub dhcp: bool,
    /// DNS servers persisted in the canonical profile (manual method only).
    pub dns: Option<Vec<String>>,
    /// Non-fatal collection failures, empty on a clean read.
    pub warnings: Vec<StatusWarning>,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The canonical profile name for the interface.
    pub name: String,
    /// Whether the canonical profile had to be created.
    pub created: bool,
    /// Number of stray bound profiles successfully deleted.
    pub deleted: usize,
}

/// Errors returned by configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The interface is not in the injected interface table.
    #[error("unknown interface: {0}")]
    UnknownInterface(String),

    /// The desired configuration is missing or malformed. Raised before
    /// any external mutation is attempted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The profile inventory could not be enumerated.
    #[error("profile inventory unavailable: {0}")]
    InventoryUnavailable(String),

    /// The canonical profile could not be guaranteed (creation or
    /// inventory failure during reconciliation).
    #[error("profile reconciliation failed: {0}")]
    ReconcileFailed(String),

    /// The profile mutation was rejected by NetworkManager.
    #[error("failed to apply configuration: {0}")]
    ApplyFailed(String),

    /// The profile was persisted but reactivation failed; live state may
    /// lag the (correct) persisted configuration.
    #[error("configuration saved but activation failed: {0}")]
    ActivationFailed(String),

    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),
}
