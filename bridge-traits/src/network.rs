//! Connectivity Probe Abstraction
//!
//! The artwork fetcher polls connectivity synchronously before each network
//! decision point: "is any network reachable", and "is it Wi-Fi" for the
//! Wi-Fi-only download preference.

use crate::error::Result;

/// Network connection type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    Cellular,
    WiFi,
    Ethernet,
    Other,
}

/// Snapshot of the current network state
#[derive(Debug, Clone, Copy)]
pub struct NetworkInfo {
    /// Whether any network is currently reachable
    pub reachable: bool,
    /// Connection type, when the platform can tell
    pub network_type: Option<NetworkType>,
}

impl NetworkInfo {
    pub fn offline() -> Self {
        Self {
            reachable: false,
            network_type: None,
        }
    }
}

/// Connectivity probe trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::network::ConnectivityProbe;
///
/// async fn may_download(probe: &dyn ConnectivityProbe, wifi_only: bool) -> bool {
///     probe.is_reachable().await && (!wifi_only || probe.is_wifi().await)
/// }
/// ```
#[async_trait::async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Get a snapshot of the current network state
    async fn network_info(&self) -> Result<NetworkInfo>;

    /// Check if any network is reachable
    async fn is_reachable(&self) -> bool {
        matches!(
            self.network_info().await,
            Ok(NetworkInfo {
                reachable: true,
                ..
            })
        )
    }

    /// Check if the current connection is Wi-Fi
    async fn is_wifi(&self) -> bool {
        matches!(
            self.network_info().await,
            Ok(NetworkInfo {
                reachable: true,
                network_type: Some(NetworkType::WiFi),
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(NetworkInfo);

    #[async_trait::async_trait]
    impl ConnectivityProbe for Fixed {
        async fn network_info(&self) -> Result<NetworkInfo> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn wifi_requires_reachability() {
        let probe = Fixed(NetworkInfo {
            reachable: true,
            network_type: Some(NetworkType::WiFi),
        });
        assert!(probe.is_reachable().await);
        assert!(probe.is_wifi().await);

        let offline = Fixed(NetworkInfo::offline());
        assert!(!offline.is_reachable().await);
        assert!(!offline.is_wifi().await);
    }
}
