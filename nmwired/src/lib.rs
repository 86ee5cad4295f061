//! Wired interface IP provisioning via NetworkManager.
//!
//! This crate keeps each managed ethernet interface on exactly one
//! canonically named NetworkManager connection profile and applies a
//! desired IPv4 configuration (DHCP or static) to it idempotently:
//!
//! - Reconciling duplicate/legacy profiles bound to an interface
//! - Applying DHCP or static IPv4 settings and reactivating the profile
//! - Reading back a merged live + persisted status snapshot
//!
//! # Example
//!
//! ```no_run
//! use nmwired::{IfaceConfig, StaticIpv4, WiredManager};
//!
//! # async fn example() -> nmwired::Result<()> {
//! let manager = WiredManager::system(vec![
//!     ("eth1".to_string(), "WAN 0".to_string()),
//!     ("eth0".to_string(), "WAN 1".to_string()),
//! ])
//! .await?;
//!
//! let status = manager
//!     .set_configuration(
//!         "eth1",
//!         &IfaceConfig::Static(StaticIpv4 {
//!             ip: "10.0.0.5".into(),
//!             mask: "255.255.255.0".into(),
//!             gateway: Some("10.0.0.1".into()),
//!             dns: None,
//!         }),
//!     )
//!     .await?;
//! println!("{} -> {:?}", status.label, status.ip_address);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ConfigError>`. Validation errors are
//! raised before any external mutation; mutation and activation failures
//! are distinct variants carrying NetworkManager's diagnostic text, so a
//! caller can tell "profile unchanged" from "profile saved, live state
//! lagging".
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade. To see log
//! output, add a logging implementation like `env_logger`:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod apply;
mod constants;
mod inventory;
mod proxies;
mod reconcile;
mod status;
mod utils;
mod wired_builders;

// Public API modules
pub mod backend;
pub mod dbus;
pub mod memory;
pub mod models;
pub mod wired_manager;

// Re-exported public API
pub use backend::{ConnectionBackend, LinkStateBackend};
pub use dbus::NmBackend;
pub use memory::MemoryBackend;
pub use models::{
    ConfigError, DefaultRoute, IfaceConfig, InterfaceStatus, Ipv4Method, Ipv4Settings, LiveIpv4,
    ProfileRecord, ReconcileOutcome, StaticIpv4, StatusWarning,
};
pub use wired_manager::WiredManager;

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
