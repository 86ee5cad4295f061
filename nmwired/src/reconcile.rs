//! Profile reconciliation.
//!
//! Converges the saved-profile inventory to the invariant that every
//! managed interface has exactly one bound profile, carrying the
//! canonical name derived from the interface id. The pass is
//! idempotent: with no external drift, a second invocation deletes
//! nothing and creates nothing.
//!
//! Each attempt moves through explicit steps
//! (`inspecting → deleting → creating`) so a failure is attributable
//! to the step it happened in, and retry is safe by re-entering from
//! inspection. Deletion failures are non-fatal: a stray profile is
//! inert as long as the canonical one exists and will be retried on
//! the next pass.

use log::{debug, info, warn};
use std::fmt::{Display, Formatter};

use crate::Result;
use crate::backend::ConnectionBackend;
use crate::constants::profile;
use crate::models::{ConfigError, ReconcileOutcome};

/// Current step of a reconciliation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Reading the profile inventory and partitioning bound profiles.
    Inspecting,
    /// Deleting non-canonical profiles bound to the interface.
    Deleting,
    /// Creating the canonical profile after confirmed absence.
    Creating,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inspecting => write!(f, "inspecting"),
            Self::Deleting => write!(f, "deleting"),
            Self::Creating => write!(f, "creating"),
        }
    }
}

/// The canonical profile name for an interface.
///
/// Stable and collision-free across distinct interface ids.
pub(crate) fn canonical_name(iface: &str) -> String {
    format!("{}{}", profile::NAME_PREFIX, iface)
}

/// Ensures the interface has exactly one bound profile with the
/// canonical name.
///
/// Only interface-bound profiles are deletion candidates; unbound
/// legacy profiles ("Wired connection 1" and friends) are left alone.
pub(crate) async fn reconcile(
    backend: &dyn ConnectionBackend,
    iface: &str,
) -> Result<ReconcileOutcome> {
    let name = canonical_name(iface);
    let mut step = Step::Inspecting;
    debug!("[{iface}] reconciling towards canonical profile '{name}'");

    let profiles = backend
        .list_profiles()
        .await
        .map_err(|e| ConfigError::ReconcileFailed(format!("{step}: {e}")))?;

    let mut canonical_present = false;
    let mut strays = Vec::new();
    for record in profiles {
        if record.device.as_deref() != Some(iface) {
            continue;
        }
        if record.name == name {
            canonical_present = true;
        } else {
            strays.push(record);
        }
    }

    step = Step::Deleting;
    debug!("[{iface}] {step}: {} stray bound profile(s)", strays.len());
    let mut deleted = 0;
    for stray in strays {
        match backend.delete_profile(&stray.uuid).await {
            Ok(()) => {
                info!(
                    "[{iface}] deleted duplicate/legacy profile '{}' ({})",
                    stray.name, stray.uuid
                );
                deleted += 1;
            }
            Err(e) => {
                // Non-fatal: the stray stays inert and is retried on
                // the next pass.
                warn!(
                    "[{iface}] failed to delete stray profile '{}' ({}): {e}",
                    stray.name, stray.uuid
                );
            }
        }
    }

    let mut created = false;
    if !canonical_present {
        step = Step::Creating;
        debug!("[{iface}] {step}: canonical profile absent");
        backend
            .create_profile(iface, &name)
            .await
            .map_err(|e| ConfigError::ReconcileFailed(format!("{step}: {e}")))?;
        info!("[{iface}] created canonical profile '{name}'");
        created = true;
    }

    debug!("[{iface}] reconcile done (created={created}, deleted={deleted})");
    Ok(ReconcileOutcome {
        name,
        created,
        deleted,
    })
}
