use futures_timer::Delay;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::Result;
use crate::apply::apply;
use crate::backend::{ConnectionBackend, LinkStateBackend};
use crate::constants::timeouts;
use crate::dbus::NmBackend;
use crate::models::{ConfigError, IfaceConfig, InterfaceStatus, ReconcileOutcome};
use crate::reconcile::reconcile;
use crate::status::snapshot;

/// High-level interface to wired profile reconciliation and IPv4
/// provisioning.
///
/// Holds the injected interface table (id → display label, in display
/// order), the two backend seams, and one lock per managed interface so
/// concurrent configuration calls cannot race the single-canonical-
/// profile invariant.
pub struct WiredManager {
    connections: Arc<dyn ConnectionBackend>,
    links: Arc<dyn LinkStateBackend>,
    interfaces: Vec<(String, String)>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    settle_delay: Duration,
}

impl WiredManager {
    /// Creates a manager talking to NetworkManager on the system D-Bus.
    ///
    /// `interfaces` maps supported interface ids to display labels;
    /// requests for ids outside this table are rejected with
    /// [`ConfigError::UnknownInterface`].
    pub async fn system(interfaces: Vec<(String, String)>) -> Result<Self> {
        let backend = Arc::new(NmBackend::system().await?);
        Ok(Self::with_backends(backend.clone(), backend, interfaces))
    }

    /// Creates a manager over explicit backends. Used by tests and by
    /// callers that already hold a D-Bus connection.
    pub fn with_backends(
        connections: Arc<dyn ConnectionBackend>,
        links: Arc<dyn LinkStateBackend>,
        interfaces: Vec<(String, String)>,
    ) -> Self {
        Self {
            connections,
            links,
            interfaces,
            locks: Mutex::new(HashMap::new()),
            settle_delay: timeouts::settle_delay(),
        }
    }

    /// Overrides the settle delay observed between reactivation and the
    /// status read. Tests set this to zero.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Returns the display label for `iface`, or `UnknownInterface`.
    fn label(&self, iface: &str) -> Result<&str> {
        self.interfaces
            .iter()
            .find(|(id, _)| id == iface)
            .map(|(_, label)| label.as_str())
            .ok_or_else(|| ConfigError::UnknownInterface(iface.to_string()))
    }

    /// The per-interface mutual-exclusion lock.
    async fn interface_lock(&self, iface: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(iface.to_string()).or_default().clone()
    }

    /// Returns a best-effort status snapshot for a managed interface.
    ///
    /// Never fails on a down or unaddressed interface; collection
    /// problems are reported in the snapshot's `warnings`.
    pub async fn status(&self, iface: &str) -> Result<InterfaceStatus> {
        let label = self.label(iface)?;
        Ok(snapshot(self.connections.as_ref(), self.links.as_ref(), iface, label).await)
    }

    /// Returns snapshots for every managed interface, in table order.
    pub async fn statuses(&self) -> Vec<InterfaceStatus> {
        let mut all = Vec::with_capacity(self.interfaces.len());
        for (iface, label) in &self.interfaces {
            all.push(snapshot(self.connections.as_ref(), self.links.as_ref(), iface, label).await);
        }
        all
    }

    /// Converges the interface to exactly one canonically named bound
    /// profile. Idempotent; safe to call repeatedly.
    pub async fn reconcile(&self, iface: &str) -> Result<ReconcileOutcome> {
        self.label(iface)?;
        let lock = self.interface_lock(iface).await;
        let _guard = lock.lock().await;
        reconcile(self.connections.as_ref(), iface).await
    }

    /// Applies a desired configuration to a managed interface and
    /// returns the resulting status snapshot.
    ///
    /// The sequence is reconcile → mutate → reactivate → settle →
    /// snapshot, all under the interface's lock. Validation failures
    /// are raised before any external mutation. There is no rollback:
    /// a failure mid-sequence is left for the next call to self-heal.
    pub async fn set_configuration(
        &self,
        iface: &str,
        config: &IfaceConfig,
    ) -> Result<InterfaceStatus> {
        let label = self.label(iface)?.to_string();
        config.validate()?;

        let lock = self.interface_lock(iface).await;
        let _guard = lock.lock().await;

        let outcome = reconcile(self.connections.as_ref(), iface).await?;
        apply(self.connections.as_ref(), &outcome.name, config).await?;

        if !self.settle_delay.is_zero() {
            debug!("[{iface}] settling for {:?}", self.settle_delay);
            Delay::new(self.settle_delay).await;
        }

        Ok(snapshot(self.connections.as_ref(), self.links.as_ref(), iface, &label).await)
    }
}
