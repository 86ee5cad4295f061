//! Applies a desired configuration to the canonical profile.
//!
//! Validation happens before any external mutation; a rejected request
//! leaves the subsystem untouched. After a successful mutation the
//! profile is deactivated and reactivated so the new settings take
//! effect. Mutation failures and activation failures are reported
//! distinctly: after `ActivationFailed` the persisted profile is
//! already correct, only live state lags.

use log::{debug, info};

use crate::Result;
use crate::backend::ConnectionBackend;
use crate::models::{ConfigError, IfaceConfig, Ipv4Method, Ipv4Settings};
use crate::utils::prefix_from_mask;

/// Derives the persisted IPv4 settings from a desired configuration.
///
/// DHCP yields `auto` with address, gateway and DNS cleared. Static
/// yields `manual` with the address in `<ip>/<prefix>` form, the prefix
/// computed from the dotted-decimal mask. Empty optional fields clear
/// the corresponding setting.
pub(crate) fn desired_settings(config: &IfaceConfig) -> Result<Ipv4Settings> {
    match config {
        IfaceConfig::Dhcp => Ok(Ipv4Settings {
            method: Some(Ipv4Method::Auto),
            ..Default::default()
        }),
        IfaceConfig::Static(s) => {
            let prefix = prefix_from_mask(&s.mask)?;
            let gateway = s
                .gateway
                .as_deref()
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_owned);
            let dns = s
                .dns
                .iter()
                .flatten()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty())
                .map(str::to_owned)
                .collect();

            Ok(Ipv4Settings {
                method: Some(Ipv4Method::Manual),
                address: Some(format!("{}/{prefix}", s.ip.trim())),
                gateway,
                dns,
            })
        }
    }
}

/// Writes the desired configuration into the profile named `name` and
/// reactivates it.
pub(crate) async fn apply(
    backend: &dyn ConnectionBackend,
    name: &str,
    config: &IfaceConfig,
) -> Result<()> {
    config.validate()?;
    let settings = desired_settings(config)?;
    debug!(
        "applying method={} to '{name}'",
        settings.method.unwrap_or(Ipv4Method::Auto)
    );

    backend
        .write_ipv4(name, &settings)
        .await
        .map_err(|e| match e {
            e @ (ConfigError::ApplyFailed(_) | ConfigError::InvalidConfig(_)) => e,
            other => ConfigError::ApplyFailed(other.to_string()),
        })?;

    backend.reactivate(name).await.map_err(|e| match e {
        e @ ConfigError::ActivationFailed(_) => e,
        other => ConfigError::ActivationFailed(other.to_string()),
    })?;

    info!("applied configuration to '{name}'");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StaticIpv4;

    fn static_config(ip: &str, mask: &str, gateway: Option<&str>) -> IfaceConfig {
        IfaceConfig::Static(StaticIpv4 {
            ip: ip.into(),
            mask: mask.into(),
            gateway: gateway.map(str::to_owned),
            dns: None,
        })
    }

    #[test]
    fn dhcp_clears_manual_fields() {
        let settings = desired_settings(&IfaceConfig::Dhcp).unwrap();
        assert_eq!(settings.method, Some(Ipv4Method::Auto));
        assert_eq!(settings.address, None);
        assert_eq!(settings.gateway, None);
        assert!(settings.dns.is_empty());
    }

    #[test]
    fn static_derives_cidr_from_mask() {
        let settings =
            desired_settings(&static_config("10.0.0.5", "255.255.255.0", Some("10.0.0.1")))
                .unwrap();
        assert_eq!(settings.method, Some(Ipv4Method::Manual));
        assert_eq!(settings.address.as_deref(), Some("10.0.0.5/24"));
        assert_eq!(settings.gateway.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn blank_gateway_clears_the_setting() {
        let settings =
            desired_settings(&static_config("10.0.0.5", "255.255.255.0", Some("   "))).unwrap();
        assert_eq!(settings.gateway, None);
    }

    #[test]
    fn dns_entries_are_trimmed_and_filtered() {
        let config = IfaceConfig::Static(StaticIpv4 {
            ip: "10.0.0.5".into(),
            mask: "255.255.0.0".into(),
            gateway: None,
            dns: Some(vec![" 8.8.8.8 ".into(), "".into(), "1.1.1.1".into()]),
        });
        let settings = desired_settings(&config).unwrap();
        assert_eq!(settings.address.as_deref(), Some("10.0.0.5/16"));
        assert_eq!(settings.dns, vec!["8.8.8.8".to_string(), "1.1.1.1".to_string()]);
    }

    #[test]
    fn malformed_mask_is_rejected() {
        let result = desired_settings(&static_config("10.0.0.5", "255.255.banana.0", None));
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }
}
