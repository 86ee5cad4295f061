//! Constants for NetworkManager D-Bus interface values and crate policy.

/// Canonical profile naming.
pub mod profile {
    /// Prefix for canonical profile names. The canonical name of an
    /// interface is this prefix concatenated with the interface id,
    /// e.g. `nmwired-eth0`.
    pub const NAME_PREFIX: &str = "nmwired-";
}

/// NetworkManager connection type keywords.
pub mod connection_type {
    pub const ETHERNET: &str = "802-3-ethernet";
}

/// Timeout and delay constants.
pub mod timeouts {
    use std::time::Duration;

    /// Wait after reactivation before live state reads can be trusted,
    /// covering address assignment and DHCP lease acquisition.
    pub const SETTLE_DELAY_SECS: u64 = 2;

    pub fn settle_delay() -> Duration {
        Duration::from_secs(SETTLE_DELAY_SECS)
    }
}
