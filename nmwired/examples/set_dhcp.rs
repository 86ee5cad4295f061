use nmwired::{IfaceConfig, WiredManager};

#[tokio::main]
async fn main() -> nmwired::Result<()> {
    env_logger::init();

    let manager = WiredManager::system(vec![("eth0".to_string(), "WAN 1".to_string())]).await?;

    let status = manager.set_configuration("eth0", &IfaceConfig::Dhcp).await?;
    println!(
        "{} back on DHCP (lease: {:?})",
        status.id, status.ip_address
    );

    Ok(())
}
