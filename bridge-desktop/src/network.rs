//! Connectivity Probe Implementation for Desktop

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    network::{ConnectivityProbe, NetworkInfo, NetworkType},
};
use std::time::Duration;
use tracing::debug;

/// TCP-probe based connectivity check.
///
/// Desktop platforms offer no portable notification API for connectivity,
/// so reachability is probed with a short TCP connect to a well-known
/// resolver. Desktop links are reported as [`NetworkType::Ethernet`];
/// the Wi-Fi-only preference is a mobile-data concern and desktop
/// connections are treated as unmetered.
pub struct DesktopConnectivity {
    probe_addr: String,
    timeout: Duration,
}

impl DesktopConnectivity {
    pub fn new() -> Self {
        Self {
            probe_addr: "8.8.8.8:53".to_string(),
            timeout: Duration::from_secs(3),
        }
    }

    pub fn with_probe_addr(probe_addr: String, timeout: Duration) -> Self {
        Self {
            probe_addr,
            timeout,
        }
    }
}

impl Default for DesktopConnectivity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectivityProbe for DesktopConnectivity {
    async fn network_info(&self) -> Result<NetworkInfo> {
        let connect = tokio::net::TcpStream::connect(&self.probe_addr);
        let reachable = tokio::time::timeout(self.timeout, connect)
            .await
            .map(|r| r.is_ok())
            .unwrap_or(false);

        debug!(addr = %self.probe_addr, reachable, "Probed connectivity");

        Ok(NetworkInfo {
            reachable,
            network_type: reachable.then_some(NetworkType::Ethernet),
        })
    }

    async fn is_wifi(&self) -> bool {
        // Desktop links are unmetered; treat them as Wi-Fi equivalents.
        self.is_reachable().await
    }
}
