use nmwired::{IfaceConfig, StaticIpv4, WiredManager};

#[tokio::main]
async fn main() -> nmwired::Result<()> {
    env_logger::init();

    let manager = WiredManager::system(vec![("eth0".to_string(), "WAN 1".to_string())]).await?;

    let config = IfaceConfig::Static(StaticIpv4 {
        ip: "192.168.50.10".to_string(),
        mask: "255.255.255.0".to_string(),
        gateway: Some("192.168.50.1".to_string()),
        dns: Some(vec!["1.1.1.1".to_string(), "8.8.8.8".to_string()]),
    });

    let status = manager.set_configuration("eth0", &config).await?;
    println!("{} is now at {:?}", status.id, status.ip_address);

    Ok(())
}
