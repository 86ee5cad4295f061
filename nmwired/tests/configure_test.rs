//! Tests for configuration application and status snapshots.
//!
//! Cover the DHCP and static round trips, fail-fast validation with
//! zero external mutations, the distinction between mutation and
//! activation failures, and graceful degradation of status reads.

use std::sync::Arc;
use std::time::Duration;

use nmwired::{
    ConfigError, ConnectionBackend, IfaceConfig, MemoryBackend, StaticIpv4, WiredManager,
};

fn manager(backend: &Arc<MemoryBackend>) -> WiredManager {
    WiredManager::with_backends(
        backend.clone(),
        backend.clone(),
        vec![
            ("eth1".to_string(), "WAN 0".to_string()),
            ("eth0".to_string(), "WAN 1".to_string()),
        ],
    )
    .with_settle_delay(Duration::ZERO)
}

fn static_config(ip: &str, mask: &str, gateway: Option<&str>) -> IfaceConfig {
    IfaceConfig::Static(StaticIpv4 {
        ip: ip.to_string(),
        mask: mask.to_string(),
        gateway: gateway.map(str::to_owned),
        dns: None,
    })
}

#[tokio::test]
async fn dhcp_round_trip() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    let status = manager
        .set_configuration("eth0", &IfaceConfig::Dhcp)
        .await
        .unwrap();
    assert!(status.dhcp);
    assert_eq!(status.dns, None);
    assert!(status.warnings.is_empty());

    let status = manager.status("eth0").await.unwrap();
    assert!(status.dhcp);
    assert_eq!(status.dns, None);
}

#[tokio::test]
async fn static_round_trip() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    let config = IfaceConfig::Static(StaticIpv4 {
        ip: "10.0.0.5".to_string(),
        mask: "255.255.255.0".to_string(),
        gateway: Some("10.0.0.1".to_string()),
        dns: Some(vec!["8.8.8.8".to_string()]),
    });
    let status = manager.set_configuration("eth0", &config).await.unwrap();

    assert!(!status.dhcp);
    assert_eq!(status.ip_address.as_deref(), Some("10.0.0.5"));
    assert_eq!(status.subnet_mask.as_deref(), Some("255.255.255.0"));
    assert_eq!(status.gateway.as_deref(), Some("10.0.0.1"));
    assert_eq!(status.dns, Some(vec!["8.8.8.8".to_string()]));

    // The persisted profile carries the derived CIDR address.
    let persisted = backend
        .read_ipv4("nmwired-eth0")
        .await
        .unwrap()
        .expect("canonical profile must exist");
    assert_eq!(persisted.address.as_deref(), Some("10.0.0.5/24"));
}

#[tokio::test]
async fn absent_canonical_profile_reads_back_as_none() {
    let backend = Arc::new(MemoryBackend::new());
    let connections: Arc<dyn ConnectionBackend> = backend.clone();

    // A missing canonical profile is a normal pre-reconcile state, not
    // an error.
    assert_eq!(connections.read_ipv4("nmwired-eth0").await.unwrap(), None);

    manager(&backend).reconcile("eth0").await.unwrap();
    assert!(
        connections
            .read_ipv4("nmwired-eth0")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn switching_back_to_dhcp_clears_persisted_fields() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    manager
        .set_configuration("eth0", &static_config("10.0.0.5", "255.255.255.0", Some("10.0.0.1")))
        .await
        .unwrap();
    let status = manager
        .set_configuration("eth0", &IfaceConfig::Dhcp)
        .await
        .unwrap();

    assert!(status.dhcp);
    assert_eq!(status.dns, None);

    let persisted = backend.read_ipv4("nmwired-eth0").await.unwrap().unwrap();
    assert_eq!(persisted.address, None);
    assert_eq!(persisted.gateway, None);
    assert!(persisted.dns.is_empty());
}

#[tokio::test]
async fn missing_ip_is_rejected_before_any_mutation() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    let err = manager
        .set_configuration("eth0", &static_config("", "255.255.255.0", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfig(_)));

    // Fail fast: nothing was reconciled, created, or written.
    assert_eq!(backend.mutations(), 0);
    assert!(backend.profile_records().is_empty());
}

#[tokio::test]
async fn malformed_mask_is_rejected_before_any_mutation() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    let err = manager
        .set_configuration("eth0", &static_config("10.0.0.5", "255.255.256.0", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfig(_)));
    assert_eq!(backend.mutations(), 0);
}

#[tokio::test]
async fn unknown_interface_is_rejected() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    let err = manager.status("ppp9").await.unwrap_err();
    assert!(matches!(err, ConfigError::UnknownInterface(id) if id == "ppp9"));

    let err = manager
        .set_configuration("ppp9", &IfaceConfig::Dhcp)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownInterface(_)));
}

#[tokio::test]
async fn activation_failure_is_distinct_from_mutation_failure() {
    let backend = Arc::new(MemoryBackend::new());
    backend.fail_activate(true);
    let manager = manager(&backend);

    let err = manager
        .set_configuration("eth0", &static_config("10.0.0.5", "255.255.255.0", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::ActivationFailed(_)));

    // The mutation went through; only live state lags.
    let persisted = backend.read_ipv4("nmwired-eth0").await.unwrap().unwrap();
    assert_eq!(persisted.address.as_deref(), Some("10.0.0.5/24"));
}

#[tokio::test]
async fn write_failure_reports_apply_failed() {
    let backend = Arc::new(MemoryBackend::new());
    backend.fail_write(true);
    let manager = manager(&backend);

    let err = manager
        .set_configuration("eth0", &IfaceConfig::Dhcp)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::ApplyFailed(_)));
}

#[tokio::test]
async fn status_degrades_gracefully_when_interface_is_down() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    let status = manager.status("eth0").await.unwrap();
    assert_eq!(status.label, "WAN 1");
    assert_eq!(status.ip_address, None);
    assert_eq!(status.subnet_mask, None);
    assert_eq!(status.gateway, None);
    assert!(!status.dhcp);
    assert_eq!(status.dns, None);
    assert!(status.warnings.is_empty());
}

#[tokio::test]
async fn gateway_is_not_attributed_to_another_interface() {
    let backend = Arc::new(MemoryBackend::new());
    backend.set_live("eth0", "192.168.1.7", 24);
    backend.set_route("192.168.1.1", "eth1");
    let manager = manager(&backend);

    let status = manager.status("eth0").await.unwrap();
    assert_eq!(status.ip_address.as_deref(), Some("192.168.1.7"));
    assert_eq!(status.gateway, None);
}

#[tokio::test]
async fn statuses_follow_table_order() {
    let backend = Arc::new(MemoryBackend::new());
    let manager = manager(&backend);

    let all = manager.statuses().await;
    let ids: Vec<_> = all.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["eth1", "eth0"]);
    assert_eq!(all[0].label, "WAN 0");
}
