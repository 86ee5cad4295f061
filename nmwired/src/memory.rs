//! In-memory simulation of the connection-management and link-state
//! subsystems.
//!
//! Backs the integration tests: it tracks every mutating call, supports
//! injected failures per operation, and emulates activation by copying
//! a manual profile's address into the live table. It never touches
//! D-Bus, so tests run anywhere.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::Result;
use crate::backend::{ConnectionBackend, LinkStateBackend};
use crate::models::{
    ConfigError, DefaultRoute, Ipv4Method, Ipv4Settings, LiveIpv4, ProfileRecord,
};

#[derive(Debug, Clone)]
struct MemProfile {
    uuid: String,
    name: String,
    device: Option<String>,
    ipv4: Ipv4Settings,
}

#[derive(Debug, Default)]
struct Inner {
    profiles: Vec<MemProfile>,
    live: HashMap<String, LiveIpv4>,
    route: Option<DefaultRoute>,
    mutations: usize,
    fail_list: bool,
    fail_create: bool,
    fail_delete: bool,
    fail_write: bool,
    fail_activate: bool,
}

/// In-memory backend with failure injection and a mutation counter.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning cannot happen here outside a panicking test.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seeds a saved profile, defaulting to DHCP.
    pub fn seed_profile(&self, uuid: &str, name: &str, device: Option<&str>) {
        self.inner().profiles.push(MemProfile {
            uuid: uuid.to_string(),
            name: name.to_string(),
            device: device.map(str::to_owned),
            ipv4: Ipv4Settings::default(),
        });
    }

    /// Seeds live IPv4 state for an interface.
    pub fn set_live(&self, iface: &str, address: &str, prefix: u8) {
        self.inner().live.insert(
            iface.to_string(),
            LiveIpv4 {
                address: address.to_string(),
                prefix,
            },
        );
    }

    /// Seeds the system default route.
    pub fn set_route(&self, gateway: &str, device: &str) {
        self.inner().route = Some(DefaultRoute {
            gateway: gateway.to_string(),
            device: device.to_string(),
        });
    }

    pub fn fail_list(&self, fail: bool) {
        self.inner().fail_list = fail;
    }

    pub fn fail_create(&self, fail: bool) {
        self.inner().fail_create = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.inner().fail_delete = fail;
    }

    pub fn fail_write(&self, fail: bool) {
        self.inner().fail_write = fail;
    }

    pub fn fail_activate(&self, fail: bool) {
        self.inner().fail_activate = fail;
    }

    /// Number of mutating calls accepted so far (create, delete, write,
    /// reactivate).
    pub fn mutations(&self) -> usize {
        self.inner().mutations
    }

    /// Snapshot of the current profile inventory.
    pub fn profile_records(&self) -> Vec<ProfileRecord> {
        self.inner()
            .profiles
            .iter()
            .map(|p| ProfileRecord {
                uuid: p.uuid.clone(),
                name: p.name.clone(),
                device: p.device.clone(),
            })
            .collect()
    }

    fn injected(op: &str) -> ConfigError {
        ConfigError::from(zbus::Error::Failure(format!("injected {op} failure")))
    }
}

#[async_trait]
impl ConnectionBackend for MemoryBackend {
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>> {
        if self.inner().fail_list {
            return Err(ConfigError::InventoryUnavailable(
                "injected inventory failure".to_string(),
            ));
        }
        Ok(self.profile_records())
    }

    async fn create_profile(&self, iface: &str, name: &str) -> Result<()> {
        let mut inner = self.inner();
        if inner.fail_create {
            return Err(Self::injected("create"));
        }
        inner.profiles.push(MemProfile {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            device: Some(iface.to_string()),
            ipv4: Ipv4Settings {
                method: Some(Ipv4Method::Auto),
                ..Default::default()
            },
        });
        inner.mutations += 1;
        Ok(())
    }

    async fn delete_profile(&self, uuid: &str) -> Result<()> {
        let mut inner = self.inner();
        if inner.fail_delete {
            return Err(Self::injected("delete"));
        }
        let before = inner.profiles.len();
        inner.profiles.retain(|p| p.uuid != uuid);
        if inner.profiles.len() == before {
            return Err(Self::injected("delete (no such profile)"));
        }
        inner.mutations += 1;
        Ok(())
    }

    async fn read_ipv4(&self, name: &str) -> Result<Option<Ipv4Settings>> {
        Ok(self
            .inner()
            .profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.ipv4.clone()))
    }

    async fn write_ipv4(&self, name: &str, settings: &Ipv4Settings) -> Result<()> {
        let mut inner = self.inner();
        if inner.fail_write {
            return Err(ConfigError::ApplyFailed(
                "injected write failure".to_string(),
            ));
        }
        let Some(profile) = inner.profiles.iter_mut().find(|p| p.name == name) else {
            return Err(ConfigError::ApplyFailed(format!(
                "no profile named '{name}'"
            )));
        };
        profile.ipv4 = settings.clone();
        inner.mutations += 1;
        Ok(())
    }

    async fn reactivate(&self, name: &str) -> Result<()> {
        let mut inner = self.inner();
        if inner.fail_activate {
            return Err(ConfigError::ActivationFailed(
                "injected activation failure".to_string(),
            ));
        }
        let Some(profile) = inner.profiles.iter().find(|p| p.name == name).cloned() else {
            return Err(ConfigError::ActivationFailed(format!(
                "no profile named '{name}'"
            )));
        };
        let Some(device) = profile.device.clone() else {
            return Err(ConfigError::ActivationFailed(format!(
                "profile '{name}' has no bound interface"
            )));
        };

        // Emulate convergence: a manual profile's address becomes live
        // immediately; switching to DHCP drops the previous assignment.
        match profile.ipv4.method {
            Some(Ipv4Method::Manual) => {
                if let Some(cidr) = &profile.ipv4.address
                    && let Some((address, prefix)) = cidr.split_once('/')
                    && let Ok(prefix) = prefix.parse::<u8>()
                {
                    inner.live.insert(
                        device.clone(),
                        LiveIpv4 {
                            address: address.to_string(),
                            prefix,
                        },
                    );
                }
                match &profile.ipv4.gateway {
                    Some(gateway) => {
                        inner.route = Some(DefaultRoute {
                            gateway: gateway.clone(),
                            device: device.clone(),
                        });
                    }
                    None => {
                        if inner.route.as_ref().is_some_and(|r| r.device == device) {
                            inner.route = None;
                        }
                    }
                }
            }
            _ => {
                inner.live.remove(&device);
                if inner.route.as_ref().is_some_and(|r| r.device == device) {
                    inner.route = None;
                }
            }
        }

        inner.mutations += 1;
        Ok(())
    }
}

#[async_trait]
impl LinkStateBackend for MemoryBackend {
    async fn live_ipv4(&self, iface: &str) -> Result<Option<LiveIpv4>> {
        Ok(self.inner().live.get(iface).cloned())
    }

    async fn default_route(&self) -> Result<Option<DefaultRoute>> {
        Ok(self.inner().route.clone())
    }
}
