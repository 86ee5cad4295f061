use nmwired::WiredManager;

#[tokio::main]
async fn main() -> nmwired::Result<()> {
    env_logger::init();

    let manager = WiredManager::system(vec![
        ("eth1".to_string(), "WAN 0".to_string()),
        ("eth0".to_string(), "WAN 1".to_string()),
    ])
    .await?;

    for status in manager.statuses().await {
        println!(
            "{:8} {:8} ip={:?} mask={:?} gw={:?} dhcp={}",
            status.label, status.id, status.ip_address, status.subnet_mask, status.gateway,
            status.dhcp
        );
        for warning in &status.warnings {
            println!("         warning: {warning}");
        }
    }

    Ok(())
}
