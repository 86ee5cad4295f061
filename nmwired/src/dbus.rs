//! NetworkManager D-Bus backend.
//!
//! Implements the [`ConnectionBackend`] and [`LinkStateBackend`] seams
//! over the system bus. Profile inventory and mutation go through the
//! `Settings` objects; live addressing and routing come from device
//! `IP4Config` objects and the `PrimaryConnection` property.

use async_trait::async_trait;
use log::{debug, warn};
use zbus::Connection;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::backend::{ConnectionBackend, LinkStateBackend};
use crate::inventory::{parse_ipv4, parse_live_entry, parse_profile};
use crate::models::{ConfigError, DefaultRoute, Ipv4Settings, LiveIpv4, ProfileRecord};
use crate::proxies::{
    NMActiveConnectionProxy, NMDeviceProxy, NMIP4ConfigProxy, NMProxy, NMSettingsConnectionProxy,
    NMSettingsProxy,
};
use crate::wired_builders::{build_ipv4_section, build_wired_profile};

/// Root object path, used where NetworkManager accepts "no object".
const ROOT_PATH: &str = "/";

/// Backend speaking to NetworkManager over the system D-Bus.
pub struct NmBackend {
    conn: Connection,
}

impl NmBackend {
    /// Connects to the system bus.
    pub async fn system() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Wraps an existing D-Bus connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Finds a profile's settings path and parsed record by profile name.
    async fn find_profile(&self, name: &str) -> Result<Option<(OwnedObjectPath, ProfileRecord)>> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        for path in settings.list_connections().await? {
            let proxy = NMSettingsConnectionProxy::builder(&self.conn)
                .path(path.clone())?
                .build()
                .await?;
            let Ok(all) = proxy.get_settings().await else {
                continue;
            };
            if let Some(record) = parse_profile(path.as_str(), &all) {
                if record.name == name {
                    return Ok(Some((path, record)));
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ConnectionBackend for NmBackend {
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>> {
        let inventory_err = |e: zbus::Error| ConfigError::InventoryUnavailable(e.to_string());

        let settings = NMSettingsProxy::new(&self.conn)
            .await
            .map_err(inventory_err)?;
        let paths = settings.list_connections().await.map_err(inventory_err)?;

        let mut records = Vec::new();
        for path in paths {
            let built = match NMSettingsConnectionProxy::builder(&self.conn).path(path.clone()) {
                Ok(builder) => builder.build().await,
                Err(e) => Err(e),
            };
            let proxy = match built {
                Ok(proxy) => proxy,
                Err(e) => {
                    warn!("skipping profile {}: {e}", path.as_str());
                    continue;
                }
            };

            match proxy.get_settings().await {
                Ok(all) => {
                    if let Some(record) = parse_profile(path.as_str(), &all) {
                        records.push(record);
                    }
                }
                Err(e) => warn!("skipping profile {}: {e}", path.as_str()),
            }
        }
        Ok(records)
    }

    async fn create_profile(&self, iface: &str, name: &str) -> Result<()> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let uuid = uuid::Uuid::new_v4().to_string();
        let profile = build_wired_profile(iface, name, &uuid);

        let path = settings.add_connection(profile).await?;
        debug!("created profile '{name}' ({uuid}) at {}", path.as_str());
        Ok(())
    }

    async fn delete_profile(&self, uuid: &str) -> Result<()> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let path = settings.get_connection_by_uuid(uuid).await?;
        let proxy = NMSettingsConnectionProxy::builder(&self.conn)
            .path(path.clone())?
            .build()
            .await?;
        proxy.delete().await?;
        debug!("deleted profile {uuid} at {}", path.as_str());
        Ok(())
    }

    async fn read_ipv4(&self, name: &str) -> Result<Option<Ipv4Settings>> {
        let Some((path, _)) = self.find_profile(name).await? else {
            return Ok(None);
        };
        let proxy = NMSettingsConnectionProxy::builder(&self.conn)
            .path(path)?
            .build()
            .await?;
        let all = proxy.get_settings().await?;
        Ok(Some(parse_ipv4(&all)))
    }

    async fn write_ipv4(&self, name: &str, settings: &Ipv4Settings) -> Result<()> {
        let Some((path, record)) = self.find_profile(name).await? else {
            return Err(ConfigError::ApplyFailed(format!(
                "no profile named '{name}'"
            )));
        };
        let iface = record.device.ok_or_else(|| {
            ConfigError::ApplyFailed(format!("profile '{name}' has no bound interface"))
        })?;

        // Update replaces settings wholesale. Canonical profiles are
        // owned by this crate, so the full dictionary is rebuilt from
        // known values, keeping the existing UUID.
        let mut profile = build_wired_profile(&iface, name, &record.uuid);
        profile.insert("ipv4", build_ipv4_section(settings)?);

        let proxy = NMSettingsConnectionProxy::builder(&self.conn)
            .path(path)?
            .build()
            .await?;
        proxy.update(profile).await?;
        debug!("updated ipv4 settings of '{name}'");
        Ok(())
    }

    async fn reactivate(&self, name: &str) -> Result<()> {
        let Some((path, _)) = self.find_profile(name).await? else {
            return Err(ConfigError::ActivationFailed(format!(
                "no profile named '{name}'"
            )));
        };

        let nm = NMProxy::new(&self.conn).await?;

        // Bring down any active instance first so NM re-applies settings.
        for active_path in nm.active_connections().await? {
            let active = NMActiveConnectionProxy::builder(&self.conn)
                .path(active_path.clone())?
                .build()
                .await?;
            if let Ok(id) = active.id().await
                && id == name
                && let Err(e) = nm.deactivate_connection(&active_path).await
            {
                warn!("deactivating '{name}' failed: {e}");
            }
        }

        let root = OwnedObjectPath::try_from(ROOT_PATH).map_err(zbus::Error::from)?;
        nm.activate_connection(&path, &root, &root)
            .await
            .map_err(|e| ConfigError::ActivationFailed(e.to_string()))?;
        debug!("activated profile '{name}'");
        Ok(())
    }
}

#[async_trait]
impl LinkStateBackend for NmBackend {
    async fn live_ipv4(&self, iface: &str) -> Result<Option<LiveIpv4>> {
        let nm = NMProxy::new(&self.conn).await?;
        let Ok(device_path) = nm.get_device_by_ip_iface(iface).await else {
            // Interface not present in the live table.
            return Ok(None);
        };

        let device = NMDeviceProxy::builder(&self.conn)
            .path(device_path)?
            .build()
            .await?;
        let ip4_path = device.ip4_config().await?;
        if ip4_path.as_str() == ROOT_PATH {
            return Ok(None);
        }

        let ip4 = NMIP4ConfigProxy::builder(&self.conn)
            .path(ip4_path)?
            .build()
            .await?;
        let data = ip4.address_data().await?;
        let Some(first) = data.first() else {
            return Ok(None);
        };
        Ok(parse_live_entry(first))
    }

    async fn default_route(&self) -> Result<Option<DefaultRoute>> {
        let nm = NMProxy::new(&self.conn).await?;
        let primary = nm.primary_connection().await?;
        if primary.as_str() == ROOT_PATH {
            return Ok(None);
        }

        let active = NMActiveConnectionProxy::builder(&self.conn)
            .path(primary)?
            .build()
            .await?;

        let ip4_path = active.ip4_config().await?;
        if ip4_path.as_str() == ROOT_PATH {
            return Ok(None);
        }
        let ip4 = NMIP4ConfigProxy::builder(&self.conn)
            .path(ip4_path)?
            .build()
            .await?;
        let gateway = ip4.gateway().await?;
        if gateway.is_empty() {
            return Ok(None);
        }

        let devices = active.devices().await?;
        let Some(device_path) = devices.first() else {
            return Ok(None);
        };
        let device = NMDeviceProxy::builder(&self.conn)
            .path(device_path.clone())?
            .build()
            .await?;
        let device = device.interface().await?;

        Ok(Some(DefaultRoute { gateway, device }))
    }
}
