//! Tests for the public data model: validation, serde shapes, and
//! error display text.

use nmwired::{ConfigError, IfaceConfig, Ipv4Method, StaticIpv4, StatusWarning};

#[test]
fn ipv4_method_keywords_round_trip() {
    assert_eq!(Ipv4Method::Auto.as_str(), "auto");
    assert_eq!(Ipv4Method::Manual.as_str(), "manual");
    assert_eq!(Ipv4Method::from_keyword("auto"), Some(Ipv4Method::Auto));
    assert_eq!(Ipv4Method::from_keyword("manual"), Some(Ipv4Method::Manual));
    assert_eq!(Ipv4Method::from_keyword("link-local"), None);
    assert_eq!(Ipv4Method::from_keyword(""), None);
}

#[test]
fn dhcp_config_is_always_valid() {
    assert!(IfaceConfig::Dhcp.validate().is_ok());
}

#[test]
fn static_config_requires_ip_and_mask() {
    let missing_ip = IfaceConfig::Static(StaticIpv4 {
        ip: "  ".into(),
        mask: "255.255.255.0".into(),
        gateway: None,
        dns: None,
    });
    assert!(matches!(
        missing_ip.validate(),
        Err(ConfigError::InvalidConfig(_))
    ));

    let missing_mask = IfaceConfig::Static(StaticIpv4 {
        ip: "10.0.0.5".into(),
        mask: "".into(),
        gateway: None,
        dns: None,
    });
    assert!(matches!(
        missing_mask.validate(),
        Err(ConfigError::InvalidConfig(_))
    ));

    let valid = IfaceConfig::Static(StaticIpv4 {
        ip: "10.0.0.5".into(),
        mask: "255.255.255.0".into(),
        gateway: Some("10.0.0.1".into()),
        dns: None,
    });
    assert!(valid.validate().is_ok());
}

#[test]
fn config_deserializes_from_mode_tagged_json() {
    let dhcp: IfaceConfig = serde_json::from_str(r#"{"mode":"dhcp"}"#).unwrap();
    assert_eq!(dhcp, IfaceConfig::Dhcp);

    let static_json = r#"{
        "mode": "static",
        "ip": "10.0.0.5",
        "mask": "255.255.255.0",
        "gateway": "10.0.0.1"
    }"#;
    let parsed: IfaceConfig = serde_json::from_str(static_json).unwrap();
    match parsed {
        IfaceConfig::Static(s) => {
            assert_eq!(s.ip, "10.0.0.5");
            assert_eq!(s.mask, "255.255.255.0");
            assert_eq!(s.gateway.as_deref(), Some("10.0.0.1"));
            assert_eq!(s.dns, None);
        }
        other => panic!("expected static config, got {other:?}"),
    }
}

#[test]
fn status_serializes_in_camel_case() {
    let status = nmwired::InterfaceStatus {
        id: "eth0".into(),
        label: "WAN 1".into(),
        ip_address: Some("10.0.0.5".into()),
        subnet_mask: Some("255.255.255.0".into()),
        gateway: None,
        dhcp: false,
        dns: None,
        warnings: vec![StatusWarning::LiveState("device missing".into())],
    };

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["ipAddress"], "10.0.0.5");
    assert_eq!(json["subnetMask"], "255.255.255.0");
    assert_eq!(json["dhcp"], false);
    assert!(json["warnings"][0]["detail"].is_string());
}

#[test]
fn error_display_carries_diagnostics() {
    let err = ConfigError::UnknownInterface("ppp9".into());
    assert_eq!(err.to_string(), "unknown interface: ppp9");

    let err = ConfigError::ActivationFailed("device busy".into());
    assert!(err.to_string().contains("activation failed"));
    assert!(err.to_string().contains("device busy"));

    let err = ConfigError::InventoryUnavailable("bus gone".into());
    assert!(err.to_string().contains("inventory"));
}
